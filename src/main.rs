use rand_mill::*;
use std::io::Write;

// Streams raw generator output to stdout for statistical testing,
// e.g. cargo run --release | PractRand stdin64 -multithreaded

fn main() -> std::io::Result<()> {

    let mut rng = Light64::from_seed(0);
    //let mut rng = Stream64::from_seed_and_stream(0, 1);
    //let mut rng = Xoroshiro128::from_seed(0);
    //let mut rng = Isaac64::from_seed(0);
    let mut stdout = std::io::stdout();

    let mut v: Vec<u8> = Vec::new();

    loop {
        let x = rng.next();

        // The stateless layer can be fed instead by hashing a counter:
        //let x = determine(n); n += 1;

        v.extend_from_slice(&x.to_le_bytes());

        if v.len() >= 0x10000 {
            stdout.write_all(v.as_slice())?;
            v.clear();
        }
    }
}
