fn main() {
    let code = stack_nuke::run_cli();
    if code != 0 {
        std::process::exit(code);
    }
}
