use crate::logger;
use crate::GlobalOpts;
use anyhow::{Context, Result};
use colored::*;
use distpack_config::DEFAULT_CONFIG_FILE;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

const INIT_YES_ENV: &str = "DISTPACK_INIT_YES";

const CONFIG_TEMPLATE: &str = r#"# distpack build configuration
# Packages an installed npm dependency into a single module plus package.json.

# Installed package to bundle (must exist under node_modules)
package = "@mdx-js/mdx"

# Name written into the generated package.json (defaults to `package`)
# name = "mdx-bundle"

# Output directory, removed and recreated on every build
out-dir = "dist"
filename = "index.js"

# Bundler executable; defaults to node_modules/.bin/esbuild, then esbuild on PATH
# bundler = "esbuild"

minify = true
targets = ["node12"]
platform = "node"
format = "cjs"

# Extra node_modules directories searched after the project ancestors
# node-modules = ["../shared/node_modules"]
"#;

/// Write a starter distpack.toml
pub fn handle_init(filename: Option<String>, _opts: &GlobalOpts) -> Result<()> {
    logger::debug("Handling init command");

    let target_filename = filename.unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    let target_path = Path::new(&target_filename);

    if target_path.exists() {
        if std::env::var(INIT_YES_ENV).is_ok() {
            logger::debug(&format!("Skipping confirmation ({} set)", INIT_YES_ENV));
        } else if !confirm_overwrite(&target_filename)? {
            logger::info("Operation cancelled by user");
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    fs::write(target_path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to create config file: {}", target_filename))?;

    logger::success(&format!("Created config file: {}", target_filename));
    println!();
    println!("Next steps:");
    println!(
        "  1. Set `package` in {} to an installed dependency",
        target_filename.bold()
    );
    println!("  2. Preview the manifest: distpack manifest");
    println!("  3. Build: distpack build");
    Ok(())
}

fn confirm_overwrite(filename: &str) -> Result<bool> {
    print!(
        "{} File '{}' already exists. Overwrite? {} ",
        "?".bold().cyan(),
        filename,
        "[y/n] ›".dimmed()
    );
    let _ = io::stdout().flush();

    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .context("Failed to read input")?;
    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
