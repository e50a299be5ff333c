//! Identify data layouts.
//!
//! Each table maps a dense field identifier to the bytes the field occupies
//! in the 4096 byte Identify data buffer (NVMe 1.0). The identifier enum and
//! its descriptor slice are generated together so they cannot drift apart.

use serde::Serialize;

/// Size of a complete Identify data buffer.
pub const IDEAL_DATA_SIZE: usize = 4096;

/// Location of one logical field inside an Identify data buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Short identifier, e.g. `VID`
    pub id: &'static str,
    /// Descriptive name written into annotated dumps
    pub name: &'static str,
    pub offset: usize,
    pub length: usize,
}

impl FieldDescriptor {
    /// One past the last byte of the field.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Ordered, immutable list of field descriptors for one buffer layout.
///
/// The table length acts as the fence: identifiers at or past it are not
/// decodable.
#[derive(Debug)]
pub struct FieldTable {
    pub title: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl FieldTable {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'static FieldDescriptor> {
        self.fields.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields.iter()
    }

    /// Look a descriptor up by its short identifier, ignoring case.
    pub fn find(&self, id: &str) -> Option<(usize, &'static FieldDescriptor)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, desc)| desc.id.eq_ignore_ascii_case(id))
    }
}

macro_rules! identify_table {
    (
        $(#[$meta:meta])*
        $field:ident, $table:ident, $title:literal {
            $($variant:ident ($id:literal, $name:literal, $offset:expr, $length:expr)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $field {
            $($variant),+
        }

        impl $field {
            pub const ALL: &'static [$field] = &[$($field::$variant),+];

            pub fn index(self) -> usize {
                self as usize
            }

            pub fn id(self) -> &'static str {
                self.descriptor().id
            }

            pub fn descriptor(self) -> &'static FieldDescriptor {
                &$table.fields[self as usize]
            }
        }

        impl std::str::FromStr for $field {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $table
                    .find(s)
                    .map(|(index, _)| $field::ALL[index])
                    .ok_or_else(|| format!("Unknown {} field: {}", $title, s))
            }
        }

        pub static $table: FieldTable = FieldTable {
            title: $title,
            fields: &[
                $(FieldDescriptor { id: $id, name: $name, offset: $offset, length: $length }),+
            ],
        };
    };
}

identify_table! {
    /// Fields of the Identify Controller data structure.
    CtrlrCapField, CTRLR_CAP_TABLE, "controller" {
        Vid ("VID", "PCI Vendor ID (VID)", 0, 2),
        Ssvid ("SSVID", "PCI Subsystem Vendor ID (SSVID)", 2, 2),
        Sn ("SN", "Serial Number (SN)", 4, 20),
        Mn ("MN", "Model Number (MN)", 24, 40),
        Fr ("FR", "Firmware Revision (FR)", 64, 8),
        Rab ("RAB", "Recommended Arbitration Burst (RAB)", 72, 1),
        Ieee ("IEEE", "IEEE OUI Identifier (IEEE)", 73, 3),
        Mic ("MIC", "Multi-Interface Capabilities (MIC)", 76, 1),
        Mdts ("MDTS", "Maximum Data Transfer Size (MDTS)", 77, 1),
        Res4e ("RES4E", "Reserved (RES4E)", 78, 178),
        Oacs ("OACS", "Optional Admin Command Support (OACS)", 256, 2),
        Acl ("ACL", "Abort Command Limit (ACL)", 258, 1),
        Aerl ("AERL", "Asynchronous Event Request Limit (AERL)", 259, 1),
        Frmw ("FRMW", "Firmware Updates (FRMW)", 260, 1),
        Lpa ("LPA", "Log Page Attributes (LPA)", 261, 1),
        Elpe ("ELPE", "Error Log Page Entries (ELPE)", 262, 1),
        Npss ("NPSS", "Number of Power States Support (NPSS)", 263, 1),
        Res108 ("RES108", "Reserved (RES108)", 264, 248),
        Sqes ("SQES", "Submission Queue Entry Size (SQES)", 512, 1),
        Cqes ("CQES", "Completion Queue Entry Size (CQES)", 513, 1),
        Res202 ("RES202", "Reserved (RES202)", 514, 2),
        Nn ("NN", "Number of Namespaces (NN)", 516, 4),
        Oncs ("ONCS", "Optional NVM Command Support (ONCS)", 520, 2),
        Fuses ("FUSES", "Fused Operation Support (FUSES)", 522, 2),
        Fna ("FNA", "Format NVM Attributes (FNA)", 524, 1),
        Vwc ("VWC", "Volatile Write Cache (VWC)", 525, 1),
        Awun ("AWUN", "Atomic Write Unit Normal (AWUN)", 526, 2),
        Awupf ("AWUPF", "Atomic Write Unit Power Fail (AWUPF)", 528, 2),
        Res212 ("RES212", "Reserved (RES212)", 530, 174),
        Res2c0 ("RES2C0", "Reserved I/O Command Set Attributes (RES2C0)", 704, 1344),
        Psd0 ("PSD0", "Power State 0 Descriptor (PSD0)", 2048, 32),
        Psd1 ("PSD1", "Power State 1 Descriptor (PSD1)", 2080, 32),
        Psd2 ("PSD2", "Power State 2 Descriptor (PSD2)", 2112, 32),
        Psd3 ("PSD3", "Power State 3 Descriptor (PSD3)", 2144, 32),
        Psd4 ("PSD4", "Power State 4 Descriptor (PSD4)", 2176, 32),
        Psd5 ("PSD5", "Power State 5 Descriptor (PSD5)", 2208, 32),
        Psd6 ("PSD6", "Power State 6 Descriptor (PSD6)", 2240, 32),
        Psd7 ("PSD7", "Power State 7 Descriptor (PSD7)", 2272, 32),
        Psd8 ("PSD8", "Power State 8 Descriptor (PSD8)", 2304, 32),
        Psd9 ("PSD9", "Power State 9 Descriptor (PSD9)", 2336, 32),
        Psd10 ("PSD10", "Power State 10 Descriptor (PSD10)", 2368, 32),
        Psd11 ("PSD11", "Power State 11 Descriptor (PSD11)", 2400, 32),
        Psd12 ("PSD12", "Power State 12 Descriptor (PSD12)", 2432, 32),
        Psd13 ("PSD13", "Power State 13 Descriptor (PSD13)", 2464, 32),
        Psd14 ("PSD14", "Power State 14 Descriptor (PSD14)", 2496, 32),
        Psd15 ("PSD15", "Power State 15 Descriptor (PSD15)", 2528, 32),
        Psd16 ("PSD16", "Power State 16 Descriptor (PSD16)", 2560, 32),
        Psd17 ("PSD17", "Power State 17 Descriptor (PSD17)", 2592, 32),
        Psd18 ("PSD18", "Power State 18 Descriptor (PSD18)", 2624, 32),
        Psd19 ("PSD19", "Power State 19 Descriptor (PSD19)", 2656, 32),
        Psd20 ("PSD20", "Power State 20 Descriptor (PSD20)", 2688, 32),
        Psd21 ("PSD21", "Power State 21 Descriptor (PSD21)", 2720, 32),
        Psd22 ("PSD22", "Power State 22 Descriptor (PSD22)", 2752, 32),
        Psd23 ("PSD23", "Power State 23 Descriptor (PSD23)", 2784, 32),
        Psd24 ("PSD24", "Power State 24 Descriptor (PSD24)", 2816, 32),
        Psd25 ("PSD25", "Power State 25 Descriptor (PSD25)", 2848, 32),
        Psd26 ("PSD26", "Power State 26 Descriptor (PSD26)", 2880, 32),
        Psd27 ("PSD27", "Power State 27 Descriptor (PSD27)", 2912, 32),
        Psd28 ("PSD28", "Power State 28 Descriptor (PSD28)", 2944, 32),
        Psd29 ("PSD29", "Power State 29 Descriptor (PSD29)", 2976, 32),
        Psd30 ("PSD30", "Power State 30 Descriptor (PSD30)", 3008, 32),
        Psd31 ("PSD31", "Power State 31 Descriptor (PSD31)", 3040, 32),
        Vs ("VS", "Vendor Specific (VS)", 3072, 1024),
    }
}

identify_table! {
    /// Fields of the Identify Namespace data structure.
    NamespaceField, NAMESPACE_TABLE, "namespace" {
        Nsze ("NSZE", "Namespace Size (NSZE)", 0, 8),
        Ncap ("NCAP", "Namespace Capacity (NCAP)", 8, 8),
        Nuse ("NUSE", "Namespace Utilization (NUSE)", 16, 8),
        Nsfeat ("NSFEAT", "Namespace Features (NSFEAT)", 24, 1),
        Nlbaf ("NLBAF", "Number of LBA Formats (NLBAF)", 25, 1),
        Flbas ("FLBAS", "Formatted LBA Size (FLBAS)", 26, 1),
        Mc ("MC", "Metadata Capabilities (MC)", 27, 1),
        Dpc ("DPC", "End-to-end Data Protection Capabilities (DPC)", 28, 1),
        Dps ("DPS", "End-to-end Data Protection Type Settings (DPS)", 29, 1),
        Res1e ("RES1E", "Reserved (RES1E)", 30, 98),
        Lbaf0 ("LBAF0", "LBA Format 0 Support (LBAF0)", 128, 4),
        Lbaf1 ("LBAF1", "LBA Format 1 Support (LBAF1)", 132, 4),
        Lbaf2 ("LBAF2", "LBA Format 2 Support (LBAF2)", 136, 4),
        Lbaf3 ("LBAF3", "LBA Format 3 Support (LBAF3)", 140, 4),
        Lbaf4 ("LBAF4", "LBA Format 4 Support (LBAF4)", 144, 4),
        Lbaf5 ("LBAF5", "LBA Format 5 Support (LBAF5)", 148, 4),
        Lbaf6 ("LBAF6", "LBA Format 6 Support (LBAF6)", 152, 4),
        Lbaf7 ("LBAF7", "LBA Format 7 Support (LBAF7)", 156, 4),
        Lbaf8 ("LBAF8", "LBA Format 8 Support (LBAF8)", 160, 4),
        Lbaf9 ("LBAF9", "LBA Format 9 Support (LBAF9)", 164, 4),
        Lbaf10 ("LBAF10", "LBA Format 10 Support (LBAF10)", 168, 4),
        Lbaf11 ("LBAF11", "LBA Format 11 Support (LBAF11)", 172, 4),
        Lbaf12 ("LBAF12", "LBA Format 12 Support (LBAF12)", 176, 4),
        Lbaf13 ("LBAF13", "LBA Format 13 Support (LBAF13)", 180, 4),
        Lbaf14 ("LBAF14", "LBA Format 14 Support (LBAF14)", 184, 4),
        Lbaf15 ("LBAF15", "LBA Format 15 Support (LBAF15)", 188, 4),
        Resc0 ("RESC0", "Reserved (RESC0)", 192, 192),
        Vs ("VS", "Vendor Specific (VS)", 384, 3712),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contiguous(table: &FieldTable) {
        let mut expected = 0;
        for desc in table.iter() {
            assert_eq!(desc.offset, expected, "{} does not follow its predecessor", desc.id);
            expected = desc.end();
        }
        assert_eq!(expected, IDEAL_DATA_SIZE, "{} table does not cover the buffer", table.title);
    }

    #[test]
    fn test_tables_cover_ideal_buffer() {
        assert_contiguous(&CTRLR_CAP_TABLE);
        assert_contiguous(&NAMESPACE_TABLE);
    }

    #[test]
    fn test_enum_matches_table() {
        assert_eq!(CtrlrCapField::ALL.len(), CTRLR_CAP_TABLE.len());
        assert_eq!(NamespaceField::ALL.len(), NAMESPACE_TABLE.len());
        for field in CtrlrCapField::ALL {
            assert_eq!(CTRLR_CAP_TABLE.get(field.index()), Some(field.descriptor()));
        }
        assert_eq!(CtrlrCapField::Psd31.descriptor().offset, 3040);
        assert_eq!(NamespaceField::Lbaf15.descriptor().offset, 188);
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("vid".parse::<CtrlrCapField>(), Ok(CtrlrCapField::Vid));
        assert_eq!("PSD7".parse::<CtrlrCapField>(), Ok(CtrlrCapField::Psd7));
        assert_eq!("flbas".parse::<NamespaceField>(), Ok(NamespaceField::Flbas));
        assert!("NSZE".parse::<CtrlrCapField>().is_err());
    }

    #[test]
    fn test_find_past_fence() {
        assert!(CTRLR_CAP_TABLE.get(CTRLR_CAP_TABLE.len()).is_none());
        assert_eq!(NAMESPACE_TABLE.find("ncap").map(|(i, _)| i), Some(1));
    }
}
