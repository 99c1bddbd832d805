// NSF player - command line front end
//
// Loads an NSF file, prints its metadata and reports anything the engine
// will not synthesize (expansion chips). Playback runs through the library:
// the `Player` driver is generic over an injected 6502 core (see the
// `cpu::Cpu` trait), so hosts pair this crate with the interpreter of their
// choice and stream samples with `Player::run`.

use std::env;
use std::process;

use nsf_rs::nsf::Nsf;
use nsf_rs::player::PlayerConfig;

fn usage() {
    eprintln!("Usage: nsf-rs file.nsf");
}

fn main() {
    println!("nsf-rs v0.1.0");
    println!("=============");
    println!();

    let Some(path) = env::args().nth(1) else {
        eprintln!("Filename must be specified.");
        usage();
        process::exit(1);
    };

    let nsf = match Nsf::load(&path) {
        Ok(nsf) => nsf,
        Err(e) => {
            eprintln!("Could not load '{}': {}", path, e);
            process::exit(1);
        }
    };
    let header = &nsf.header;

    let config = PlayerConfig::load_or_default();

    println!("Loaded a valid NSF.");
    println!();
    println!("TITLE:      {}", header.title);
    println!("ARTIST:     {}", header.artist);
    println!("COPYRIGHT:  {}", header.copyright);
    println!();
    println!("Load:       ${:04X}", header.load);
    println!("Init:       ${:04X}", header.init);
    println!("Play:       ${:04X}", header.play);
    println!();

    if header.uses_bankswitching() {
        print!("Tune uses bankswitching:\nBanks:      ");
        for bank in header.bankswitch {
            print!("${:02X} ", bank);
        }
        println!();
        println!();
    }

    println!("Clock standard: {}", header.region());
    println!("Play frequency: {:.2} Hz", header.play_freq_hz());
    println!("Songs:          {} (starting at {})", header.songs, header.start_song);
    println!("Sample rate:    {} Hz", config.sample_rate);

    let chips = header.expansion_chips();
    if !chips.is_empty() {
        println!();
        println!("Tune uses expansion sound chip(s): {}", chips.join(", "));
        println!("Expansion audio is not synthesized; those channels stay silent.");
    }

    println!();
    println!("This build has no 6502 core wired in. Inject one through the");
    println!("nsf_rs::cpu::Cpu trait and drive playback with nsf_rs::Player.");
}
