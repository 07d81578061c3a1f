//! Small coded values stored in cached records.
//!
//! Ordinal answers are stored as one byte holding the variant's code;
//! multi-select answers are bit sets. Text labels live with the report layer.

use std::ops::{BitOr, BitOrAssign};

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $code),+
        }

        impl $name {
            /// Every variant in code order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn code(self) -> u8 {
                self as u8
            }

            pub fn from_code(code: u8) -> Option<Self> {
                Self::ALL.get(usize::from(code)).copied()
            }
        }
    };
}

macro_rules! flag_set {
    (
        $(#[$meta:meta])*
        $name:ident: $bits:ty { $($flag:ident = $bit:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name($bits);

        impl $name {
            $(pub const $flag: Self = Self(1 << $bit);)+

            pub const EMPTY: Self = Self(0);
            pub const ALL: Self = Self(0 $(| (1 << $bit))+);

            pub fn bits(self) -> $bits {
                self.0
            }

            /// `None` when `bits` has a flag outside [`Self::ALL`].
            pub fn from_bits(bits: $bits) -> Option<Self> {
                (bits & !Self::ALL.0 == 0).then_some(Self(bits))
            }

            /// Flag for the `index`-th option of the answer list.
            pub fn from_index(index: usize) -> Option<Self> {
                u32::try_from(index)
                    .ok()
                    .and_then(|shift| <$bits>::checked_shl(1, shift))
                    .and_then(Self::from_bits)
            }

            pub fn is_empty(self) -> bool {
                self.0 == 0
            }

            pub fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }
    };
}

coded_enum! {
    /// Reported severity of a single symptom.
    Severity {
        #[default]
        None = 0,
        Mild = 1,
        Moderate = 2,
        Severe = 3,
    }
}

coded_enum! {
    /// Self-rated current health.
    HealthNow {
        #[default]
        None = 0,
        Excellent = 1,
        Good = 2,
        Fair = 3,
        Poor = 4,
    }
}

coded_enum! {
    /// How the subject feels today.
    Feeling {
        #[default]
        None = 0,
        Poor = 1,
        Fair = 2,
        Good = 3,
    }
}

coded_enum! {
    /// Health compared with the previous check-in.
    HealthChange {
        #[default]
        None = 0,
        Worse = 1,
        Same = 2,
        Better = 3,
    }
}

coded_enum! {
    PregnancyStatus {
        #[default]
        Unknown = 0,
        Yes = 1,
        No = 2,
    }
}

flag_set! {
    /// Kinds of health-care visit reported in one check-in.
    HealthcareVisits: u8 {
        ER = 0,
        HOSPITAL = 1,
        OUTPATIENT = 2,
        TELEHEALTH = 3,
    }
}

flag_set! {
    /// Activities the subject was unable to do.
    HealthImpact: u8 {
        NORMAL_ACTIVITIES_OTHER = 0,
        WORK_OTHER = 1,
        NORMAL_ACTIVITIES = 2,
        GOT_CARE = 3,
        WORK_OR_SCHOOL = 4,
    }
}

flag_set! {
    /// Reactions at the injection site.
    SiteReaction: u8 {
        PAIN = 0,
        REDNESS = 1,
        SWELLING = 2,
        ITCHING = 3,
    }
}

flag_set! {
    /// Whole-body reactions.
    SystemicReaction: u16 {
        ABDOMINAL_PAIN = 0,
        CHILLS = 1,
        DIARRHEA = 2,
        FATIGUE = 3,
        HEADACHE = 4,
        JOINT_PAINS = 5,
        MUSCLE_OR_BODY_ACHES = 6,
        NAUSEA = 7,
        RASH = 8,
        VOMITING = 9,
    }
}
