/// Platform materials and the flat colours the renderer paints with.
/// Materials never change collision; they only pick a fill colour,
/// so all material semantics are centralized here.

/// 24-bit colour, independent of any terminal backend.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const GOLD: Rgb = Rgb(255, 215, 0);

    /// Linear mix: `t = 0.0` → self, `t = 1.0` → other.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Material {
    Normal,
    Grass,
    Stone,
    Brick,
}

impl Material {
    /// Base fill colour for a platform of this material.
    pub fn color(self) -> Rgb {
        match self {
            Material::Grass => Rgb(0x22, 0x8B, 0x22),
            Material::Stone => Rgb(0x69, 0x69, 0x69),
            Material::Brick => Rgb(0x8B, 0x45, 0x13),
            Material::Normal => Rgb(0x32, 0xCD, 0x32),
        }
    }

    /// Colour of the vertical texture seams drawn every 20 px.
    pub fn seam_color(self) -> Rgb {
        // rgba(0,0,0,0.3) over the base colour
        self.color().lerp(Rgb::BLACK, 0.3)
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::Normal
    }
}
