use fixed::types::I32F32;

/// Physical millimetre. Fixed-point so layout arithmetic is deterministic
/// across platforms; values round to the nearest milli-mm.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Mm(I32F32);

impl Mm {
    pub const ZERO: Mm = Mm(I32F32::from_bits(0));

    pub fn from_f32(value: f32) -> Mm {
        if !value.is_finite() {
            return Mm::ZERO;
        }
        let milli = (value as f64 * 1000.0).round();
        let milli = milli.clamp(i64::MIN as f64, i64::MAX as f64) as i64;
        Mm::from_milli_i64(milli)
    }

    pub fn from_i32(value: i32) -> Mm {
        Mm::from_milli_i64((value as i64) * 1000)
    }

    pub fn to_f32(self) -> f32 {
        self.0.to_num()
    }

    /// Millimetres expressed in PostScript points (72 pt per inch).
    pub fn to_pt_f32(self) -> f32 {
        self.to_f32() * 72.0 / 25.4
    }

    pub fn to_milli_i64(self) -> i64 {
        let bits = self.0.to_bits() as i128;
        let denom = 1i128 << 32;
        let scaled = bits * 1000;
        let adj = if scaled >= 0 { denom / 2 } else { -denom / 2 };
        let milli = (scaled + adj) / denom;
        milli.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }

    pub fn max(self, other: Mm) -> Mm {
        if self >= other { self } else { other }
    }

    pub fn min(self, other: Mm) -> Mm {
        if self <= other { self } else { other }
    }

    pub fn mul_ratio(self, num: i64, denom: i64) -> Mm {
        if denom == 0 {
            return Mm::ZERO;
        }
        let milli = self.to_milli_i64() as i128;
        let value = div_round_i128(milli.saturating_mul(num as i128), denom as i128);
        Mm::from_milli_i128(value)
    }

    pub fn from_milli_i64(milli: i64) -> Mm {
        Mm::from_milli_i128(milli as i128)
    }

    fn from_milli_i128(milli: i128) -> Mm {
        let denom = 1i128 << 32;
        let adj = if milli >= 0 { 500 } else { -500 };
        let bits = (milli * denom + adj) / 1000;
        let bits = bits.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
        Mm(I32F32::from_bits(bits))
    }
}

impl std::ops::Add for Mm {
    type Output = Mm;
    fn add(self, rhs: Mm) -> Mm {
        Mm::from_milli_i128(self.to_milli_i64() as i128 + rhs.to_milli_i64() as i128)
    }
}

impl std::ops::AddAssign for Mm {
    fn add_assign(&mut self, rhs: Mm) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Mm {
    type Output = Mm;
    fn sub(self, rhs: Mm) -> Mm {
        Mm::from_milli_i128(self.to_milli_i64() as i128 - rhs.to_milli_i64() as i128)
    }
}

impl std::ops::SubAssign for Mm {
    fn sub_assign(&mut self, rhs: Mm) {
        *self = *self - rhs;
    }
}

impl std::ops::Mul<i32> for Mm {
    type Output = Mm;
    fn mul(self, rhs: i32) -> Mm {
        let milli = self.to_milli_i64() as i128;
        Mm::from_milli_i128(milli.saturating_mul(rhs as i128))
    }
}

impl std::ops::Div<i32> for Mm {
    type Output = Mm;
    fn div(self, rhs: i32) -> Mm {
        if rhs == 0 {
            Mm::ZERO
        } else {
            let milli = self.to_milli_i64() as i128;
            Mm::from_milli_i128(div_round_i128(milli, rhs as i128))
        }
    }
}

impl std::ops::Mul<f32> for Mm {
    type Output = Mm;
    fn mul(self, rhs: f32) -> Mm {
        if !rhs.is_finite() {
            return Mm::ZERO;
        }
        Mm::from_f32(self.to_f32() * rhs)
    }
}

impl std::ops::Div<f32> for Mm {
    type Output = Mm;
    fn div(self, rhs: f32) -> Mm {
        if rhs == 0.0 || !rhs.is_finite() {
            Mm::ZERO
        } else {
            Mm::from_f32(self.to_f32() / rhs)
        }
    }
}

impl std::ops::Neg for Mm {
    type Output = Mm;
    fn neg(self) -> Mm {
        Mm::from_milli_i128(-(self.to_milli_i64() as i128))
    }
}

impl std::iter::Sum for Mm {
    fn sum<I: Iterator<Item = Mm>>(iter: I) -> Mm {
        iter.fold(Mm::ZERO, |acc, v| acc + v)
    }
}

fn div_round_i128(num: i128, den: i128) -> i128 {
    if den == 0 {
        return 0;
    }
    let den_abs = den.abs();
    if num >= 0 {
        (num + (den_abs / 2)) / den
    } else {
        -(((-num) + (den_abs / 2)) / den)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: Mm,
    pub height: Mm,
}

impl Size {
    pub fn a4() -> Self {
        Self {
            width: Mm::from_i32(210),
            height: Mm::from_i32(297),
        }
    }

    pub fn from_mm(width_mm: f32, height_mm: f32) -> Self {
        Self {
            width: Mm::from_f32(width_mm),
            height: Mm::from_f32(height_mm),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: Mm,
    pub right: Mm,
    pub bottom: Mm,
    pub left: Mm,
}

impl Margins {
    pub fn all(value: f32) -> Self {
        let v = Mm::from_f32(value);
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn zero() -> Self {
        Self {
            top: Mm::ZERO,
            right: Mm::ZERO,
            bottom: Mm::ZERO,
            left: Mm::ZERO,
        }
    }
}

/// Page geometry for one export operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageConfig {
    pub page_size: Size,
    pub margins: Margins,
    /// Oversampling factor applied when rasterizing regions and when
    /// rendering raster preview pages. 2.0 matches the capture density of
    /// the report view.
    pub pixel_scale: f32,
}

impl PageConfig {
    pub fn a4(margin_mm: f32) -> Self {
        Self {
            page_size: Size::a4(),
            margins: Margins::all(margin_mm),
            pixel_scale: 2.0,
        }
    }

    pub fn usable_width(&self) -> Mm {
        (self.page_size.width - self.margins.left - self.margins.right).max(Mm::ZERO)
    }

    pub fn usable_height(&self) -> Mm {
        (self.page_size.height - self.margins.top - self.margins.bottom).max(Mm::ZERO)
    }
}
