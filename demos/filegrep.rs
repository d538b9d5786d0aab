//! A sketch of a file-search CLI showing off greedy list flags:
//!
//!     filegrep src -e rs toml -f Makefile -v
//!
//! collects two extensions and one extra file without repeating the flags.
use greedyopt::{Error, Flag, Parser};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut parser = Parser::new();
    parser.require_positionals(1)?;
    parser.define(Flag::bool("verbose", false, "print every file visited").short('v'))?;
    parser.define(Flag::list("ext", &[], "file extensions to include").short('e'))?;
    parser.define(Flag::list("file", &[], "extra files to include").short('f'))?;
    parser.define(Flag::string("out", "-", "where to write the file list").short('o'))?;

    match parser.parse_env() {
        Ok(()) => {}
        Err(Error::Help) => {
            print!("{}", greedyopt::help::usage(&parser, "filegrep"));
            return Ok(());
        }
        Err(err) => {
            eprintln!("filegrep: {}", err);
            eprint!("{}", greedyopt::help::usage(&parser, "filegrep"));
            std::process::exit(2);
        }
    }

    println!("root: {}", parser.args()[0]);
    if let Some(exts) = parser.get_list("ext") {
        println!("extensions: {:?}", exts);
    }
    if let Some(files) = parser.get_list("file") {
        println!("files: {:?}", files);
    }
    if parser.get_bool("verbose").unwrap_or(false) {
        println!("(verbose)");
    }
    println!("output: {}", parser.get_str("out").unwrap_or("-"));
    Ok(())
}
