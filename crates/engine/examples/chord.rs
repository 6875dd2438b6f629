use std::time::Duration;

use kitchen_engine::{CpalBackend, EngineConfig};
use kitchen_tone::{AudioBackend, AudioOutput, ToneEvent, generate_chord};

fn main() -> anyhow::Result<()> {
    let mut backend = CpalBackend::new(EngineConfig::default());
    let mut output = backend.open()?;
    println!("Output sample rate: {} Hz", output.sample_rate());

    let mut rng = rand::thread_rng();
    for _ in 0..4 {
        let chord = generate_chord(&mut rng);
        println!("{:?}", chord.kind);
        output.trigger(&chord);
        std::thread::sleep(Duration::from_secs(3));
        if let Some(voices) = output.poll() {
            println!("active voices: {voices}");
        }
    }

    output.trigger(&ToneEvent::chime());
    std::thread::sleep(Duration::from_millis(1100));
    output.close();

    Ok(())
}
