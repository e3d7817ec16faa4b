fn main() {
    aurctl::run_cli();
}
