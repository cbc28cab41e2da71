use std::{env, fs};
use ncmachine::parse::parse;

fn main() {
    let filename = env::args().nth(1).expect("file name required");
    let input = match fs::read_to_string(&filename) {
        Ok(input) => input,
        Err(e) => return eprintln!("Error: {}: {}", filename, e),
    };

    match parse(&filename, &input) {
        Err(e) => eprintln!("Parse error: {}", e),
        Ok(prog) => print!("{}", prog),
    }
}
