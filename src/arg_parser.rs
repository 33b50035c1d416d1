use argparse::{ArgumentParser, Print};

// The scanner takes no behavioral options, its whole contract is the
// JSON document on stdout
pub fn parse_args() {
    let mut parser = ArgumentParser::new();

    parser.set_description(
        "Report AMD GPU identity, temperature and VRAM usage as JSON",
    );

    parser.add_option(
        &["-V", "--version"],
        Print(env!("CARGO_PKG_VERSION").to_string()),
        "Show the program version",
    );

    parser.parse_args_or_exit();
}
