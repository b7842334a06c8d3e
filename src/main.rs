fn main() {
    srgen::cli::run();
}
