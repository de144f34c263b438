use xshell::{cmd, Shell};

fn main() -> xshell::Result<()> {
    // When run locally, results may differ from actual CI runs triggered by
    // .github/workflows/ci.yml
    // - Official CI runs latest stable
    // - Local runs use whatever the default Rust is locally
    let sh = Shell::new()?;

    // See if any code needs to be formatted
    cmd!(sh, "cargo fmt --all -- --check").run()?;

    // See if clippy has any complaints.
    // - Type complexity must be ignored because we use huge templates for queries
    cmd!(
        sh,
        "cargo clippy --workspace --all-features -- -D warnings -A clippy::type_complexity"
    )
    .run()?;

    // Check for errors with no features enabled
    cmd!(sh, "cargo check --workspace --no-default-features").run()?;

    // Check for errors with default features enabled
    cmd!(sh, "cargo check --workspace").run()?;

    // Run the test suite, doc tests included
    cmd!(sh, "cargo test --workspace --all-features").run()?;

    Ok(())
}
