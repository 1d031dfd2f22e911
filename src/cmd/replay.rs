use super::LogArgs;
use crate::reports;
use clap::Args;
use netforge::error::NfResult;
use netforge::event_log::load_event_log_from_path;
use netforge::net::{NetStructure, PetriNet};
use netforge::replay;

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub input: LogArgs,

    /// Net saved by `discover --export`.
    #[arg(short, long)]
    pub net: String,
}

pub fn run(args: ReplayArgs) -> NfResult<()> {
    println!("\n📂 Loading Net: {}", args.net);
    let structure = NetStructure::load_from_file(&args.net)?;
    let mut net = PetriNet::from_structure(&structure)?;

    let log = load_event_log_from_path(&args.input.log, &args.input.format())?;

    let fitness = replay::evaluate(&mut net, &log.traces);

    reports::print_net(&net);
    reports::print_arc_counters(&net);
    println!("Fitness: {:.4}", fitness);
    Ok(())
}
