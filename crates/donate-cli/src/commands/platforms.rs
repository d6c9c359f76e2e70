use anyhow::Result;
use donate_config::Config;
use donate_core::Platform;

pub fn handle(config: &Config) -> Result<()> {
    println!("Always redacted:");
    println!("  {}", config.pii.common.join(", "));

    for platform in Platform::ALL {
        println!("\n{}:", platform);
        let keys = config.pii.platform_keys(platform);
        if keys.is_empty() {
            println!("  (no extra keys)");
        } else {
            println!("  {}", keys.join(", "));
        }
    }

    Ok(())
}
