//! Binary entrypoint for fontcol-cli (made by FontLab https://www.fontlab.com/)

fn main() {
    if let Err(err) = fontcol_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
