//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - Z-basis layer canonicalization for stabilizer circuits",
        style("Stratum").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  stratum-ir       Flat stabilizer circuit representation");
    println!("  stratum-stim     Circuit text parser and emitter");
    println!("  stratum-compile  Layering, canonicalization passes and XZ flip");
    println!("  stratum-cli      Command-line interface");
    println!();
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
