//! Particle species produced by the generator.

use std::fmt;

/// The closed set of species the generator emits.
///
/// Codes follow the PDG numbering; [`Species::Cluster`] is the
/// generator-private code for an unfragmented fireball.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Species {
    /// Proton (2212).
    Proton,
    /// Antiproton (-2212).
    AntiProton,
    /// Neutron (2112).
    Neutron,
    /// Antineutron (-2112).
    AntiNeutron,
    /// Positive pion (211).
    PiPlus,
    /// Neutral pion (111).
    PiZero,
    /// Negative pion (-211).
    PiMinus,
    /// Intermediate fireball record (3501).
    Cluster,
}

impl Species {
    /// Every species, in PDG-code order of first appearance.
    pub const ALL: [Species; 8] = [
        Species::Proton,
        Species::AntiProton,
        Species::Neutron,
        Species::AntiNeutron,
        Species::PiPlus,
        Species::PiZero,
        Species::PiMinus,
        Species::Cluster,
    ];

    /// PDG particle code.
    pub const fn pdg_code(self) -> i32 {
        match self {
            Self::Proton => 2212,
            Self::AntiProton => -2212,
            Self::Neutron => 2112,
            Self::AntiNeutron => -2112,
            Self::PiPlus => 211,
            Self::PiZero => 111,
            Self::PiMinus => -211,
            Self::Cluster => 3501,
        }
    }

    /// Look up a species by PDG code.
    pub fn from_pdg_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.pdg_code() == code)
    }

    /// Rest mass in GeV assigned to emitted hadrons.
    ///
    /// Clusters have no fixed mass; their particle record carries it,
    /// and this returns `0.0` for them.
    pub const fn mass(self) -> f64 {
        match self {
            Self::Proton | Self::AntiProton => 0.938,
            Self::Neutron | Self::AntiNeutron => 0.940,
            Self::PiZero => 0.135,
            Self::PiPlus | Self::PiMinus => 0.139,
            Self::Cluster => 0.0,
        }
    }

    /// Electric charge in units of e.
    pub const fn charge(self) -> i32 {
        match self {
            Self::Proton | Self::PiPlus => 1,
            Self::AntiProton | Self::PiMinus => -1,
            Self::Neutron | Self::AntiNeutron | Self::PiZero | Self::Cluster => 0,
        }
    }

    /// Whether this is a baryon or antibaryon.
    pub const fn is_baryon(self) -> bool {
        matches!(
            self,
            Self::Proton | Self::AntiProton | Self::Neutron | Self::AntiNeutron
        )
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Proton => "p",
            Self::AntiProton => "pbar",
            Self::Neutron => "n",
            Self::AntiNeutron => "nbar",
            Self::PiPlus => "pi+",
            Self::PiZero => "pi0",
            Self::PiMinus => "pi-",
            Self::Cluster => "cluster",
        };
        f.write_str(name)
    }
}
