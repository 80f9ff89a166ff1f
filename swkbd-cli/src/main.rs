mod terminal;

use anyhow::Context;
use std::{
    io,
    sync::{Arc, mpsc},
    thread,
};
use swkbd_std::{
    Completion, KeyboardBridge,
    cli::{Cli, clap::Parser},
    logging,
};
use terminal::{Event, TerminalHost};

const QUALIFIER: &str = "io.github";
const ORGANIZATION: &str = "swkbd";
const APPLICATION: &str = "swkbd";
const OPTIONS_FILE: &str = "options.json";

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logging::init(args.verbose());

    let default_options = directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join(OPTIONS_FILE));
    let options = args.options(default_options.as_deref());
    let config = args
        .keyboard_config()
        .context("invalid keyboard configuration")?;

    let bridge = KeyboardBridge::new(options);
    let (events, rx) = mpsc::channel();
    let host = Arc::new(TerminalHost::new(events.clone()));
    bridge.attach(&host);

    let emulator = thread::Builder::new()
        .name("emulator".to_owned())
        .spawn({
            let bridge = bridge.clone();
            move || {
                let completion = bridge.execute_completion(config);
                if events.send(Event::Done).is_err() {
                    tracing::debug!("UI loop gone before the keyboard finished");
                }
                completion
            }
        })
        .context("couldn't spawn the emulator thread")?;

    terminal::run(&host, &rx, &mut io::stdin().lock(), &mut io::stdout().lock())?;

    let completion = emulator
        .join()
        .map_err(|_panic| anyhow::anyhow!("emulator thread panicked"))?;

    match completion {
        Completion::Submitted(data) => println!("button {}: \"{}\"", data.button, data.text),
        Completion::Dismissed => println!("dismissed"),
        Completion::TimedOut => println!("timed out"),
        Completion::Busy | Completion::Unavailable => println!("keyboard unavailable"),
    }

    Ok(())
}
