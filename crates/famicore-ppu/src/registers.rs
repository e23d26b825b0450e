//! PPU register bit fields (control, mask, status).

use bitflags::bitflags;

bitflags! {
    /// Control register (`$2000`, write only).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Control: u8 {
        /// Base nametable select, horizontal bit.
        const NAMETABLE_X = 1 << 0;
        /// Base nametable select, vertical bit.
        const NAMETABLE_Y = 1 << 1;
        /// VRAM increment per data access: 0 = +1 across, 1 = +32 down.
        const INCREMENT_MODE = 1 << 2;
        /// Pattern table for 8x8 sprites.
        const SPRITE_TABLE = 1 << 3;
        /// Pattern table for the background.
        const BACKGROUND_TABLE = 1 << 4;
        /// Sprite size: 0 = 8x8, 1 = 8x16.
        const SPRITE_SIZE = 1 << 5;
        /// Master/slave select. Unused by the console.
        const MASTER_SLAVE = 1 << 6;
        /// Raise NMI at the start of vertical blank.
        const ENABLE_NMI = 1 << 7;
    }
}

impl Control {
    /// VRAM address step for `$2007` accesses.
    #[inline]
    #[must_use]
    pub fn vram_increment(self) -> u16 {
        if self.contains(Self::INCREMENT_MODE) {
            32
        } else {
            1
        }
    }

    /// Sprite height in scanlines.
    #[inline]
    #[must_use]
    pub fn sprite_height(self) -> i16 {
        if self.contains(Self::SPRITE_SIZE) {
            16
        } else {
            8
        }
    }

    /// Background pattern table base address.
    #[inline]
    #[must_use]
    pub fn background_table_base(self) -> u16 {
        if self.contains(Self::BACKGROUND_TABLE) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Sprite pattern table base address (8x8 mode only).
    #[inline]
    #[must_use]
    pub fn sprite_table_base(self) -> u16 {
        if self.contains(Self::SPRITE_TABLE) {
            0x1000
        } else {
            0x0000
        }
    }
}

bitflags! {
    /// Mask register (`$2001`, write only).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Mask: u8 {
        /// Grayscale output.
        const GRAYSCALE = 1 << 0;
        /// Show the background in the leftmost 8 pixels.
        const RENDER_BACKGROUND_LEFT = 1 << 1;
        /// Show sprites in the leftmost 8 pixels.
        const RENDER_SPRITES_LEFT = 1 << 2;
        /// Render the background at all.
        const RENDER_BACKGROUND = 1 << 3;
        /// Render sprites at all.
        const RENDER_SPRITES = 1 << 4;
        /// Emphasize red.
        const ENHANCE_RED = 1 << 5;
        /// Emphasize green.
        const ENHANCE_GREEN = 1 << 6;
        /// Emphasize blue.
        const ENHANCE_BLUE = 1 << 7;
    }
}

impl Mask {
    /// True when either plane is being rendered.
    #[inline]
    #[must_use]
    pub fn rendering_enabled(self) -> bool {
        self.intersects(Self::RENDER_BACKGROUND | Self::RENDER_SPRITES)
    }
}

bitflags! {
    /// Status register (`$2002`, read only).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StatusRegister: u8 {
        /// More than eight sprites landed on one scanline.
        const SPRITE_OVERFLOW = 1 << 5;
        /// Opaque sprite-zero pixel met an opaque background pixel.
        const SPRITE_ZERO_HIT = 1 << 6;
        /// Vertical blank is in progress.
        const VERTICAL_BLANK = 1 << 7;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vram_increment_tracks_mode_bit() {
        assert_eq!(Control::empty().vram_increment(), 1);
        assert_eq!(Control::INCREMENT_MODE.vram_increment(), 32);
    }

    #[test]
    fn sprite_height_tracks_size_bit() {
        assert_eq!(Control::empty().sprite_height(), 8);
        assert_eq!(Control::SPRITE_SIZE.sprite_height(), 16);
    }

    #[test]
    fn pattern_table_bases() {
        assert_eq!(Control::empty().background_table_base(), 0x0000);
        assert_eq!(Control::BACKGROUND_TABLE.background_table_base(), 0x1000);
        assert_eq!(Control::SPRITE_TABLE.sprite_table_base(), 0x1000);
    }

    #[test]
    fn rendering_enabled_when_either_plane_is_on() {
        assert!(!Mask::empty().rendering_enabled());
        assert!(Mask::RENDER_BACKGROUND.rendering_enabled());
        assert!(Mask::RENDER_SPRITES.rendering_enabled());
    }
}
