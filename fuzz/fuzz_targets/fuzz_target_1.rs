#![no_main]
use libfuzzer_sys::fuzz_target;

// We check no invariants here, just that arbitrary token streams under any
// positional policy never panic or hang the single pass.
fuzz_target!(|data: &[u8]| {
    let (mode, data) = match data.split_first() {
        Some(split) => split,
        None => return,
    };

    let mut parser = greedyopt::Parser::new();
    match mode % 3 {
        1 => {
            parser.allow_leading_positionals().unwrap();
        }
        2 => {
            parser.require_positionals(usize::from(mode / 3)).unwrap();
        }
        _ => {}
    }
    parser
        .define(greedyopt::Flag::bool("verbose", false, "verbose").short('v'))
        .unwrap();
    parser
        .define(greedyopt::Flag::list("ext", &[], "extensions").short('e'))
        .unwrap();
    parser
        .define(greedyopt::Flag::string("out", "", "output").short('o'))
        .unwrap();

    let tokens: Vec<String> = data
        // Arguments can't contain null bytes (on Unix) so it's a
        // reasonable separator
        .split(|&byte| byte == 0)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect();
    let _ = parser.parse(tokens);
});
