fn main() -> Result<(), Box<dyn std::error::Error>> {
    recast::runtime::run()
}
