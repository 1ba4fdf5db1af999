use rpc_status::{
    CodeSpace, Mapper, MapperRegistry, ResolutionJournal, ResolveContext, Shapes, StatusError,
    StatusValue, definitions, registry, spaces,
};
use std::sync::Arc;

/// Pretend interface stub: returns the raw `DWORD` the server sent back.
fn open_service(name: &str) -> u32 {
    match name {
        "Spooler" => 0,
        "NoSuchService" => 1060,
        _ => 5,
    }
}

/// Turn a raw return value into a `Result`, the way a generated stub would.
fn check(ctx: &ResolveContext, ret: u32) -> Result<(), StatusError> {
    if ret == 0 {
        return Ok(());
    }
    match registry::resolve(ctx, ret) {
        Some(err) => Err(err),
        // Unknown failure codes still fail; the caller gets the raw value.
        None => Err(StatusError::new(
            &spaces::WIN32,
            ret,
            "UNKNOWN",
            "Unlisted status code.",
        )),
    }
}

/// A mapper that is not table-backed.
struct EndpointMapper;

const EPM: CodeSpace = CodeSpace::new("epm", Shapes::UNSIGNED);

impl Mapper for EndpointMapper {
    fn space(&self) -> &'static CodeSpace {
        &EPM
    }

    fn map_value(&self, _ctx: &ResolveContext, value: StatusValue<'_>) -> Option<StatusError> {
        match EPM.canonicalize(value)? {
            0x16c9_a0d6 => Some(StatusError::new(
                &EPM,
                0x16c9_a0d6,
                "EPT_S_NOT_REGISTERED",
                "There are no more endpoints available from the endpoint mapper.",
            )),
            _ => None,
        }
    }
}

fn main() {
    // 1. Process-wide registry, for code that cannot thread one through
    definitions::install();

    println!("--- Process-wide registry ---\n");
    for service in ["Spooler", "NoSuchService", "Locked"] {
        let ctx = ResolveContext::for_operation("svcctl.ROpenServiceW")
            .with_metadata("service", String::from(service));

        match check(&ctx, open_service(service)) {
            Ok(()) => println!("{service}: opened"),
            Err(err) => {
                println!("{service}: {err}");

                let mut line = String::new();
                if err.log_entry(&ctx).write_to(&mut line).is_ok() {
                    println!("   log: {line}");
                }
            }
        }
    }

    // 2. Explicit registry with a journal and a custom mapper ahead of the built-ins
    println!("\n--- Explicit registry ---\n");
    let journal = Arc::new(ResolutionJournal::new(16, 512));
    let registry = MapperRegistry::with_journal(Arc::clone(&journal));
    registry.register(EndpointMapper);
    definitions::register_builtin(&registry);

    let ctx = ResolveContext::for_operation("epm.ept_map");
    for value in [
        StatusValue::U32(0x16c9_a0d6),
        StatusValue::I32(0xC000_0022_u32 as i32),
        StatusValue::Text("0x5"),
        StatusValue::U32(0xDEAD_BEEF),
    ] {
        match registry.resolve(&ctx, value) {
            Some(err) => println!("{value} -> {err}"),
            None => println!("{value} -> (no mapper recognized it)"),
        }
    }

    println!("\nJournal ({} records, {} misses):", journal.len(), journal.miss_count());
    for record in journal.get_all() {
        println!("   {} hit={} space={:?}", record.value, record.is_hit(), record.space());
    }
}
