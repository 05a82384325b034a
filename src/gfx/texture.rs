use crate::{
    gfx::Bitmap,
    math::{Vector2, Vector4},
    util::{self, BoxedError},
};

/// One of the fixed texture units a draw call can sample from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TextureSlot(usize);

impl TextureSlot {
    pub const COUNT: usize = 5;

    #[inline]
    pub fn new(index: usize) -> Option<TextureSlot> {
        if index < TextureSlot::COUNT {
            Some(TextureSlot(index))
        } else {
            None
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }

    /// Slots 1 and 2 are tinted darker when sampled.
    #[inline]
    pub fn is_darkened(self) -> bool {
        self.0 == 1 || self.0 == 2
    }
}

/// Colour sampled from a slot that has nothing bound yet.
pub const UNBOUND_TEXEL: Vector4 = Vector4::new(0.0, 0.0, 0.0, 1.0);

pub trait Sampler {
    fn sample(&self, slot: TextureSlot, uv: Vector2) -> Vector4;
}

/// The bitmaps currently bound to each texture slot.
///
/// Binding replaces whatever was there before. Every bind bumps the slot's generation so a
/// renderer can tell which uploads it has already seen.
#[derive(Debug, Default, Clone)]
pub struct TextureSlots {
    bitmaps: [Option<Bitmap>; TextureSlot::COUNT],
    generations: [u64; TextureSlot::COUNT],
}

impl TextureSlots {
    /// Bind `bitmap` to slot `index`. The image is stored bottom row first so that `v = 0`
    /// samples the bottom of the picture.
    pub fn bind(&mut self, index: usize, mut bitmap: Bitmap) -> Result<(), BoxedError> {
        let slot = match TextureSlot::new(index) {
            Some(slot) => slot,
            None => {
                return util::boxed_err(format!(
                    "Texture slot {} does not exist (there are {})",
                    index,
                    TextureSlot::COUNT
                ))
            }
        };
        if bitmap.is_empty() {
            return util::boxed_err(format!("Cannot bind an empty bitmap to texture slot {}", index));
        }
        bitmap.flip_rows();
        log::debug!(
            "Binding {}x{} bitmap to texture slot {}",
            bitmap.width(),
            bitmap.height(),
            index
        );
        self.bitmaps[slot.index()] = Some(bitmap);
        self.generations[slot.index()] += 1;
        Ok(())
    }

    #[inline]
    pub fn get(&self, slot: TextureSlot) -> Option<&Bitmap> {
        self.bitmaps[slot.index()].as_ref()
    }

    /// How many times the slot has been bound. Zero means never.
    #[inline]
    pub fn generation(&self, slot: TextureSlot) -> u64 {
        self.generations[slot.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureSlot, Option<&Bitmap>)> {
        self.bitmaps
            .iter()
            .enumerate()
            .map(|(index, bitmap)| (TextureSlot(index), bitmap.as_ref()))
    }
}

impl Sampler for TextureSlots {
    /// Nearest-texel lookup with clamped coordinates.
    fn sample(&self, slot: TextureSlot, uv: Vector2) -> Vector4 {
        let bitmap = match self.get(slot) {
            Some(bitmap) => bitmap,
            None => return UNBOUND_TEXEL,
        };
        let texel_coord = |t: f32, size: u32| -> u32 {
            let scaled = (t.max(0.0) * size as f32).floor() as u32;
            scaled.min(size.saturating_sub(1))
        };
        let x = texel_coord(uv.x(), bitmap.width());
        let y = texel_coord(uv.y(), bitmap.height());
        bitmap.texel(x, y)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn two_rows() -> Bitmap {
        // Top row white, bottom row black.
        Bitmap::from_rgba8(1, 2, vec![255, 255, 255, 255, 0, 0, 0, 255]).unwrap()
    }

    #[test]
    fn unbound_slots_are_black() {
        let slots = TextureSlots::default();
        for index in 0..TextureSlot::COUNT {
            let slot = TextureSlot::new(index).unwrap();
            assert_eq!(0, slots.generation(slot));
            assert_eq!(UNBOUND_TEXEL, slots.sample(slot, Vector2::new(0.5, 0.5)));
        }
    }

    #[test]
    fn bind_rejects_missing_slots() {
        let mut slots = TextureSlots::default();
        assert!(slots.bind(TextureSlot::COUNT, two_rows()).is_err());
        assert!(slots.iter().all(|(_, bitmap)| bitmap.is_none()));
    }

    #[test]
    fn bound_images_sample_bottom_up() {
        let mut slots = TextureSlots::default();
        slots.bind(3, two_rows()).unwrap();
        let slot = TextureSlot::new(3).unwrap();
        assert_eq!(Vector4::new(0.0, 0.0, 0.0, 1.0), slots.sample(slot, Vector2::new(0.5, 0.1)));
        assert_eq!(Vector4::splat(1.0), slots.sample(slot, Vector2::new(0.5, 0.9)));
        // Clamped at the edges.
        assert_eq!(Vector4::splat(1.0), slots.sample(slot, Vector2::new(2.0, 1.0)));
        assert_eq!(Vector4::new(0.0, 0.0, 0.0, 1.0), slots.sample(slot, Vector2::new(-1.0, -1.0)));
    }

    #[test]
    fn bind_rejects_empty_bitmaps() {
        let mut slots = TextureSlots::default();
        let slot = TextureSlot::new(0).unwrap();
        assert!(slots.bind(0, Bitmap::default()).is_err());
        assert_eq!(0, slots.generation(slot));
        assert_eq!(UNBOUND_TEXEL, slots.sample(slot, Vector2::new(0.5, 0.5)));
    }

    #[test]
    fn last_bind_wins() {
        let mut slots = TextureSlots::default();
        let slot = TextureSlot::new(0).unwrap();
        slots.bind(0, two_rows()).unwrap();
        let red = Bitmap::from_rgba8(1, 1, vec![255, 0, 0, 255]).unwrap();
        slots.bind(0, red).unwrap();
        assert_eq!(2, slots.generation(slot));
        assert_eq!(Vector4::new(1.0, 0.0, 0.0, 1.0), slots.sample(slot, Vector2::new(0.5, 0.5)));
    }

    #[test]
    fn darkened_slots() {
        let darkened: Vec<_> = (0..TextureSlot::COUNT)
            .filter_map(TextureSlot::new)
            .filter(|slot| slot.is_darkened())
            .map(TextureSlot::index)
            .collect();
        assert_eq!(vec![1, 2], darkened);
        assert_eq!(None, TextureSlot::new(5));
    }
}
