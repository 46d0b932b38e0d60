fn main() -> anyhow::Result<()> {
    kana_bench::harness::run_builtin("javascript")
}
