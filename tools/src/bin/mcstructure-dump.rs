use std::io::Cursor;

use clap::{App, Arg};
use env_logger::Env;
use log::info;
use mcstructure::{Reader, StateRegistry};
use mcstructure_nbt::stream;
use mcstructure_tools::{summarise, Result};

fn dump_events(data: &[u8]) -> Result<()> {
    let mut parser = stream::Parser::new(Cursor::new(data));
    let mut indent = 0;

    loop {
        match parser.next() {
            Err(e) if e.is_eof() => break,
            Err(e) => return Err(e.into()),
            Ok(value) => {
                match value {
                    stream::Value::CompoundEnd => indent -= 4,
                    stream::Value::ListEnd => indent -= 4,
                    _ => {}
                }

                println!("{:indent$}{:?}", "", value, indent = indent);

                match value {
                    stream::Value::Compound(_) => indent += 4,
                    stream::Value::List(_, _, _) => indent += 4,
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let matches = App::new("mcstructure-dump")
        .about("print the contents of a Bedrock .mcstructure file")
        .arg(Arg::with_name("file").required(true))
        .arg(
            Arg::with_name("palette")
                .long("palette")
                .short("p")
                .takes_value(true)
                .default_value(mcstructure::DEFAULT_PALETTE)
                .help("palette to resolve blocks with"),
        )
        .arg(
            Arg::with_name("raw")
                .long("raw")
                .takes_value(false)
                .conflicts_with("events")
                .help("print the whole NBT tree as JSON"),
        )
        .arg(
            Arg::with_name("events")
                .long("events")
                .takes_value(false)
                .help("print the NBT parser events of any NBT file, even a broken one"),
        )
        .get_matches();

    let path = matches.value_of_os("file").unwrap();

    // Event dumps are for poking at any NBT file, so they skip the check.
    if matches.is_present("events") {
        return dump_events(&std::fs::read(path)?);
    }

    mcstructure::check_extension(path)?;
    let data = std::fs::read(path)?;

    if matches.is_present("raw") {
        let root = mcstructure_nbt::from_bytes(&data)?;
        let root = mcstructure_nbt::Value::Compound(root);
        println!("{}", serde_json::to_string_pretty(&root)?);
        return Ok(());
    }

    let registry = StateRegistry::open();
    let mut reader = Reader::new(&registry).palette(matches.value_of("palette").unwrap());
    let structure = reader.read(&data)?;
    info!(
        "read {} with {} distinct states",
        path.to_string_lossy(),
        registry.len() - 1
    );

    let summary = summarise(&structure, &registry, reader.diagnostics());
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
