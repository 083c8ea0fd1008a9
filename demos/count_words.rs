use argh::FromArgs;
use std::{collections::BTreeMap, error::Error, fs, path::PathBuf};
use tstrie::TstMap;

/// Count words in file
#[derive(FromArgs)]
struct CountWords {
    /// which map implementation to use for counting
    #[argh(positional)]
    map_impl: String,

    /// input to read words from an external file
    #[argh(positional)]
    input_file: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: CountWords = argh::from_env();

    let contents = fs::read_to_string(args.input_file)?;

    let stats = match args.map_impl.as_str() {
        "std" => count_words_std(&contents),
        "tstrie" => count_words_tstrie(&contents),
        other => panic!("unknown map impl '{other}'"),
    };

    println!("STATS: {stats:?}");

    Ok(())
}

#[derive(Debug)]
#[allow(dead_code)] // this struct is used for its debug repr
struct WordStats {
    num_unique: u64,
    num_total: u64,
    top_word: String,
    top_word_count: u64,
}

fn count_words_tstrie(contents: &str) -> WordStats {
    let mut map = TstMap::<u64>::new();
    let mut num_total = 0;

    for word in contents.split_whitespace() {
        num_total += 1;
        if let Some(count) = map.get_mut(word) {
            *count += 1;
        } else {
            map.insert(word, 1);
        }
    }

    let (top_word, top_word_count) = map
        .iter()
        .max_by_key(|(_, count)| **count)
        .map(|(word, count)| (word, *count))
        .expect("there should be at least 1 word in the input");

    WordStats {
        num_unique: map.len() as u64,
        num_total,
        top_word,
        top_word_count,
    }
}

fn count_words_std(contents: &str) -> WordStats {
    let mut map = BTreeMap::<&str, u64>::new();
    let mut num_total = 0;

    for word in contents.split_whitespace() {
        num_total += 1;
        map.entry(word)
            .and_modify(|count| {
                *count += 1;
            })
            .or_insert(1);
    }

    let (top_word, top_word_count) = map
        .iter()
        .max_by_key(|(_, count)| **count)
        .map(|(word, count)| (word.to_string(), *count))
        .expect("there should be at least 1 word in the input");

    WordStats {
        num_unique: map.len() as u64,
        num_total,
        top_word,
        top_word_count,
    }
}
