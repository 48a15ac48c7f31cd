use rust_decimal::Decimal;

/// Base units (yoctoNEAR) per NEAR
pub const YOCTO_PER_NEAR: u128 = 1_000_000_000_000_000_000_000_000;

const NEAR_DECIMALS: u32 = 24;

/// Account balance snapshot, kept in base units and shown in NEAR
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Balance {
    yocto: u128,
}

impl Balance {
    pub fn from_yocto(yocto: u128) -> Self {
        Self { yocto }
    }

    pub fn yocto(&self) -> u128 {
        self.yocto
    }

    /// Balance divided by 10^24, without losing any base-unit digits
    pub fn near(&self) -> Decimal {
        let whole = (self.yocto / YOCTO_PER_NEAR) as i128;
        let fraction = (self.yocto % YOCTO_PER_NEAR) as i128;
        (Decimal::from_i128_with_scale(whole, 0)
            + Decimal::from_i128_with_scale(fraction, NEAR_DECIMALS))
        .normalize()
    }
}

impl std::fmt::Display for Balance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.near())
    }
}
