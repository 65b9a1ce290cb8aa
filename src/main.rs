use anyhow::Result;

fn main() -> Result<()> {
    medicore_desk::cli::run()
}
