use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFlag {
    Carry,
    Zero,
    InterruptDisable,
    Decimal,
    Overflow,
    Negative,
}

/* bits 4 and 5 only exist on the stack copy of the register */
/* "No CPU effect; see: the B flag" */
const BREAK_BIT: u8 = 1 << 4;
/* "No CPU effect; always pushed as 1" */
const UNUSED_BIT: u8 = 1 << 5;

impl StatusFlag {
    pub fn bit(&self) -> u8 {
        match self {
            StatusFlag::Carry => 0,
            StatusFlag::Zero => 1,
            StatusFlag::InterruptDisable => 2,
            StatusFlag::Decimal => 3,
            StatusFlag::Overflow => 6,
            StatusFlag::Negative => 7,
        }
    }

    pub fn mask(&self) -> u8 {
        1 << self.bit()
    }
}

/**
 * The processor status register. Kept as a plain byte, with the named flags read and written
 * through [StatusFlag]. The byte layout is only exposed when the register goes to or from the
 * stack, where the break and unused bits get their hardware treatment.
 */
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    bits: u8,
}

impl Status {
    pub fn is_set(&self, flag: StatusFlag) -> bool {
        self.bits & flag.mask() != 0
    }

    pub fn set(&mut self, flag: StatusFlag, new_val: bool) {
        if new_val {
            self.bits |= flag.mask();
        } else {
            self.bits &= !flag.mask();
        }
    }

    /* 1 if the flag is set, 0 otherwise; handy for carry arithmetic */
    pub fn as_num(&self, flag: StatusFlag) -> u8 {
        (self.bits >> flag.bit()) & 1
    }

    /* PHP and friends: break and unused always read as 1 on the stack */
    pub fn to_pushed_byte(&self) -> u8 {
        self.bits | BREAK_BIT | UNUSED_BIT
    }

    /* PLP and RTI: everything except bits 4 and 5 comes from the stack */
    pub fn pull_from(&mut self, pulled: u8) {
        let kept = BREAK_BIT | UNUSED_BIT;
        self.bits = (self.bits & kept) | (pulled & !kept);
    }
}

#[cfg(test)]
impl Status {
    pub fn from_bits(bits: u8) -> Status {
        Status { bits }
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }
}

impl fmt::Display for Status {
    /* same ordering as the datasheet: NV_BDIZC */
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.bits)
    }
}
