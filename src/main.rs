fn main() -> anyhow::Result<()> {
    screenscribe_lib::run()
}
