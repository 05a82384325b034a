use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver},
    thread,
};

use henhouse::gfx::{Bitmap, BitmapReader, TextureSlot};

/// A texture finished loading and can be bound to `slot`.
pub struct ImageReady {
    pub slot: usize,
    pub bitmap: Bitmap,
}

fn load(path: &Path) -> io::Result<Bitmap> {
    let mut reader = BufReader::new(File::open(path)?);
    BitmapReader::default().read(&mut reader)
}

/// Load `slot0.dds` through `slot4.dds` from `dir` in the background.
///
/// Each image is sent as soon as it is read. Missing or broken files are logged and skipped.
pub fn spawn(dir: PathBuf) -> io::Result<Receiver<ImageReady>> {
    let (sender, receiver) = mpsc::channel();
    thread::Builder::new()
        .name("texture-loader".into())
        .spawn(move || {
            for slot in 0..TextureSlot::COUNT {
                let path = dir.join(format!("slot{}.dds", slot));
                match load(&path) {
                    Ok(bitmap) => {
                        log::info!("Loaded {}", path.display());
                        // Nobody is listening any more.
                        if sender.send(ImageReady { slot, bitmap }).is_err() {
                            return;
                        }
                    }
                    Err(err) => log::warn!("Could not load {}: {}", path.display(), err),
                }
            }
        })?;
    Ok(receiver)
}
