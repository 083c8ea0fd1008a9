use argh::FromArgs;
use std::{error::Error, fs, io, path::PathBuf};
use tstrie::{
    visitor::{DotPrinter, TreePrinter},
    TstMap,
};

/// Render the trie built from a word list, one word per line
#[derive(FromArgs)]
struct TreeViz {
    /// input to read words from an external file
    #[argh(positional)]
    input_file: PathBuf,

    /// emit Graphviz dot instead of indented text
    #[argh(switch)]
    dot: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: TreeViz = argh::from_env();

    let contents = fs::read_to_string(args.input_file)?;

    let mut map = TstMap::new();
    for (line_number, word) in contents.lines().enumerate() {
        let word = word.trim();
        if !word.is_empty() {
            map.insert(word, line_number + 1);
        }
    }

    if args.dot {
        DotPrinter::print_tree(io::stdout().lock(), &map)?;
    } else {
        print!("{}", TreePrinter::render(&map));
    }

    Ok(())
}
