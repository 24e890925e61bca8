use proxy_fnd::{AppContext, ConfigValue, ConfigVariable};

fn main() -> Result<(), proxy_fnd::Error> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/proxy.conf".to_string());

    let mut ctx = AppContext::new();
    ctx.create_store()?;

    // Defined in code before the load; the file cannot override it.
    ctx.define(ConfigVariable::new(
        "log_level",
        "minimum severity written to the log",
        ConfigValue::Str("info".into()),
    ))?;

    let stats = ctx.load(&path)?;
    println!(
        "{path}: {} defined, {} duplicates, {} invalid",
        stats.defined, stats.skipped_duplicate, stats.skipped_invalid
    );

    for name in ["log_level", "worker_count", "name", "ratios"] {
        match ctx.get(name) {
            Some(variable) => println!("{name} = {}", variable.value),
            None => println!("{name} is not defined"),
        }
    }

    ctx.destroy_store()?;
    Ok(())
}
