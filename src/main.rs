fn main() {
    holdem_nash::cli::run();
}
