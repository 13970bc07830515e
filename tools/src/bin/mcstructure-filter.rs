use clap::{App, Arg};
use env_logger::Env;
use log::{info, warn};
use mcstructure::{filter, Reader, StateRegistry, StateValue, Writer};
use mcstructure_tools::{parse_assignment, ErrorMessage, Result};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let matches = App::new("mcstructure-filter")
        .about("keep, remove or change blocks of a Bedrock .mcstructure file")
        .arg(Arg::with_name("structure").required(true))
        .arg(
            Arg::with_name("out-file")
                .long("out-file")
                .short("o")
                .takes_value(true)
                .required(true)
                .help("path to write the resulting .mcstructure file"),
        )
        .arg(
            Arg::with_name("only")
                .long("only")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .conflicts_with("except")
                .help("block to keep, eg minecraft:stone. Everything else is removed"),
        )
        .arg(
            Arg::with_name("except")
                .long("except")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("block to remove, eg minecraft:air"),
        )
        .arg(
            Arg::with_name("with-state")
                .long("with-state")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("keep blocks with this state, eg top_slot_bit or top_slot_bit=true"),
        )
        .arg(
            Arg::with_name("set")
                .long("set")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("change a state on every block that has it, eg direction=2"),
        )
        .arg(
            Arg::with_name("layer")
                .long("layer")
                .takes_value(true)
                .default_value("0")
                .help("layer to filter, 0 for blocks and 1 for liquids"),
        )
        .arg(
            Arg::with_name("palette")
                .long("palette")
                .takes_value(true)
                .default_value(mcstructure::DEFAULT_PALETTE)
                .help("palette to resolve blocks with"),
        )
        .get_matches();

    let in_path = matches.value_of_os("structure").unwrap();
    let out_path = matches.value_of_os("out-file").unwrap();
    let layer: usize = matches
        .value_of("layer")
        .unwrap()
        .parse()
        .map_err(|_| ErrorMessage("layer must be a number".to_owned()))?;

    mcstructure::check_extension(in_path)?;
    mcstructure::check_extension(out_path)?;

    let registry = StateRegistry::open();
    let data = std::fs::read(in_path)?;
    let mut reader = Reader::new(&registry).palette(matches.value_of("palette").unwrap());
    let mut structure = reader.read(&data)?;

    let mut voxels = structure.layer(layer)?.clone();

    if let Some(only) = matches.values_of("only") {
        let names: Vec<&str> = only.collect();
        voxels = filter::with_block_ids(&voxels, &registry, &names);
    }
    if let Some(except) = matches.values_of("except") {
        let names: Vec<&str> = except.collect();
        voxels = filter::except_block_ids(&voxels, &registry, &names);
    }

    if let Some(states) = matches.values_of("with-state") {
        let mut keys = vec![];
        let mut values = vec![];
        for state in states {
            if state.contains('=') {
                values.push(parse_assignment(state)?);
            } else {
                keys.push(state);
            }
        }

        if !keys.is_empty() {
            voxels = filter::with_block_states(&voxels, &registry, &keys);
        }
        if !values.is_empty() {
            let values: Vec<(&str, StateValue)> = values
                .iter()
                .map(|(k, v)| (k.as_str(), v.clone()))
                .collect();
            voxels = filter::with_block_states_and_values(&voxels, &registry, &values);
        }
    }

    if let Some(sets) = matches.values_of("set") {
        let sets = sets.map(parse_assignment).collect::<Result<Vec<_>>>()?;
        let sets: Vec<(&str, StateValue)> =
            sets.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
        voxels = filter::replace_block_states(&voxels, &registry, &sets);
    }

    structure.replace_layer(layer, voxels)?;

    let mut writer = Writer::new(&registry);
    let out = writer.write(&structure)?;
    std::fs::write(out_path, out)?;

    let problems = reader.diagnostics().len() + writer.diagnostics().len();
    if problems > 0 {
        warn!("{} blocks or states could not be kept as they were", problems);
    }
    info!("wrote {}", out_path.to_string_lossy());

    Ok(())
}
