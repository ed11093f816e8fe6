fn main() {
    suitexml::cli::run();
}
