//! Greet any number of people given before the flags:
//!
//!     greet alice bob --shout -n 2
use greedyopt::{Error, Flag, Parser};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut parser = Parser::new();
    parser.allow_leading_positionals()?;
    parser.define(Flag::bool("shout", false, "greet loudly").short('s'))?;
    parser.define(Flag::string("number", "1", "how many times to greet").short('n'))?;

    match parser.parse_env() {
        Ok(()) => {}
        Err(Error::Help) => {
            print!("{}", greedyopt::help::usage(&parser, "greet"));
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    let times: u32 = parser.get_str("number").unwrap_or("1").parse()?;
    for name in parser.args() {
        let mut message = format!("Hello {}", name);
        if parser.get_bool("shout").unwrap_or(false) {
            message = message.to_uppercase();
        }
        for _ in 0..times {
            println!("{}", message);
        }
    }
    Ok(())
}
