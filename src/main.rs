fn main() -> anyhow::Result<()> {
    arena_viewer::run()
}
