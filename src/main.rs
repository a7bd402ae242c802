fn main() -> anyhow::Result<()> {
    particle_ocean::run()
}
