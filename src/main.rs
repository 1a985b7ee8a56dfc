fn main() -> anyhow::Result<()> {
    yeti_goggles::run()?;
    Ok(())
}
