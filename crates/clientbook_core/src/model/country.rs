//! ISO 3166-1 country reference table.
//!
//! # Responsibility
//! - Provide the closed country set used by company records.
//! - Map each entry to its stable alpha-2 code and English display name.
//!
//! # Invariants
//! - Serialization uses the alpha-2 code, never the variant name.
//! - This is static reference data; entries are never derived at runtime.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! countries {
    ($( $variant:ident => $code:literal, $name:literal; )*) => {
        /// Country of a company, from the ISO 3166-1 alpha-2 table.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Country {
            $( $variant, )*
        }

        impl Country {
            /// Every country in table order (alphabetical by display name).
            pub const ALL: &'static [Country] = &[ $( Country::$variant, )* ];

            /// ISO 3166-1 alpha-2 code, e.g. `"DE"`.
            pub fn code(self) -> &'static str {
                match self {
                    $( Self::$variant => $code, )*
                }
            }

            /// English short display name, e.g. `"Germany"`.
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )*
                }
            }

            /// Resolves a country from its alpha-2 code.
            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $( $code => Some(Self::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

countries! {
    Afghanistan => "AF", "Afghanistan";
    Albania => "AL", "Albania";
    Algeria => "DZ", "Algeria";
    Andorra => "AD", "Andorra";
    Angola => "AO", "Angola";
    AntiguaAndBarbuda => "AG", "Antigua and Barbuda";
    Argentina => "AR", "Argentina";
    Armenia => "AM", "Armenia";
    Australia => "AU", "Australia";
    Austria => "AT", "Austria";
    Azerbaijan => "AZ", "Azerbaijan";
    Bahamas => "BS", "Bahamas";
    Bahrain => "BH", "Bahrain";
    Bangladesh => "BD", "Bangladesh";
    Barbados => "BB", "Barbados";
    Belarus => "BY", "Belarus";
    Belgium => "BE", "Belgium";
    Belize => "BZ", "Belize";
    Benin => "BJ", "Benin";
    Bhutan => "BT", "Bhutan";
    Bolivia => "BO", "Bolivia";
    BosniaAndHerzegovina => "BA", "Bosnia and Herzegovina";
    Botswana => "BW", "Botswana";
    Brazil => "BR", "Brazil";
    Brunei => "BN", "Brunei";
    Bulgaria => "BG", "Bulgaria";
    BurkinaFaso => "BF", "Burkina Faso";
    Burundi => "BI", "Burundi";
    CaboVerde => "CV", "Cabo Verde";
    Cambodia => "KH", "Cambodia";
    Cameroon => "CM", "Cameroon";
    Canada => "CA", "Canada";
    CentralAfricanRepublic => "CF", "Central African Republic";
    Chad => "TD", "Chad";
    Chile => "CL", "Chile";
    China => "CN", "China";
    Colombia => "CO", "Colombia";
    Comoros => "KM", "Comoros";
    CongoBrazzaville => "CG", "Congo";
    CongoKinshasa => "CD", "Congo (Democratic Republic)";
    CostaRica => "CR", "Costa Rica";
    CoteDIvoire => "CI", "Côte d'Ivoire";
    Croatia => "HR", "Croatia";
    Cuba => "CU", "Cuba";
    Cyprus => "CY", "Cyprus";
    Czechia => "CZ", "Czechia";
    Denmark => "DK", "Denmark";
    Djibouti => "DJ", "Djibouti";
    Dominica => "DM", "Dominica";
    DominicanRepublic => "DO", "Dominican Republic";
    Ecuador => "EC", "Ecuador";
    Egypt => "EG", "Egypt";
    ElSalvador => "SV", "El Salvador";
    EquatorialGuinea => "GQ", "Equatorial Guinea";
    Eritrea => "ER", "Eritrea";
    Estonia => "EE", "Estonia";
    Eswatini => "SZ", "Eswatini";
    Ethiopia => "ET", "Ethiopia";
    Fiji => "FJ", "Fiji";
    Finland => "FI", "Finland";
    France => "FR", "France";
    Gabon => "GA", "Gabon";
    Gambia => "GM", "Gambia";
    Georgia => "GE", "Georgia";
    Germany => "DE", "Germany";
    Ghana => "GH", "Ghana";
    Greece => "GR", "Greece";
    Grenada => "GD", "Grenada";
    Guatemala => "GT", "Guatemala";
    Guinea => "GN", "Guinea";
    GuineaBissau => "GW", "Guinea-Bissau";
    Guyana => "GY", "Guyana";
    Haiti => "HT", "Haiti";
    Honduras => "HN", "Honduras";
    Hungary => "HU", "Hungary";
    Iceland => "IS", "Iceland";
    India => "IN", "India";
    Indonesia => "ID", "Indonesia";
    Iran => "IR", "Iran";
    Iraq => "IQ", "Iraq";
    Ireland => "IE", "Ireland";
    Israel => "IL", "Israel";
    Italy => "IT", "Italy";
    Jamaica => "JM", "Jamaica";
    Japan => "JP", "Japan";
    Jordan => "JO", "Jordan";
    Kazakhstan => "KZ", "Kazakhstan";
    Kenya => "KE", "Kenya";
    Kiribati => "KI", "Kiribati";
    Kuwait => "KW", "Kuwait";
    Kyrgyzstan => "KG", "Kyrgyzstan";
    Laos => "LA", "Laos";
    Latvia => "LV", "Latvia";
    Lebanon => "LB", "Lebanon";
    Lesotho => "LS", "Lesotho";
    Liberia => "LR", "Liberia";
    Libya => "LY", "Libya";
    Liechtenstein => "LI", "Liechtenstein";
    Lithuania => "LT", "Lithuania";
    Luxembourg => "LU", "Luxembourg";
    Madagascar => "MG", "Madagascar";
    Malawi => "MW", "Malawi";
    Malaysia => "MY", "Malaysia";
    Maldives => "MV", "Maldives";
    Mali => "ML", "Mali";
    Malta => "MT", "Malta";
    MarshallIslands => "MH", "Marshall Islands";
    Mauritania => "MR", "Mauritania";
    Mauritius => "MU", "Mauritius";
    Mexico => "MX", "Mexico";
    Micronesia => "FM", "Micronesia";
    Moldova => "MD", "Moldova";
    Monaco => "MC", "Monaco";
    Mongolia => "MN", "Mongolia";
    Montenegro => "ME", "Montenegro";
    Morocco => "MA", "Morocco";
    Mozambique => "MZ", "Mozambique";
    Myanmar => "MM", "Myanmar";
    Namibia => "NA", "Namibia";
    Nauru => "NR", "Nauru";
    Nepal => "NP", "Nepal";
    Netherlands => "NL", "Netherlands";
    NewZealand => "NZ", "New Zealand";
    Nicaragua => "NI", "Nicaragua";
    Niger => "NE", "Niger";
    Nigeria => "NG", "Nigeria";
    NorthKorea => "KP", "North Korea";
    NorthMacedonia => "MK", "North Macedonia";
    Norway => "NO", "Norway";
    Oman => "OM", "Oman";
    Pakistan => "PK", "Pakistan";
    Palau => "PW", "Palau";
    Panama => "PA", "Panama";
    PapuaNewGuinea => "PG", "Papua New Guinea";
    Paraguay => "PY", "Paraguay";
    Peru => "PE", "Peru";
    Philippines => "PH", "Philippines";
    Poland => "PL", "Poland";
    Portugal => "PT", "Portugal";
    Qatar => "QA", "Qatar";
    Romania => "RO", "Romania";
    Russia => "RU", "Russia";
    Rwanda => "RW", "Rwanda";
    SaintKittsAndNevis => "KN", "Saint Kitts and Nevis";
    SaintLucia => "LC", "Saint Lucia";
    SaintVincentAndTheGrenadines => "VC", "Saint Vincent and the Grenadines";
    Samoa => "WS", "Samoa";
    SanMarino => "SM", "San Marino";
    SaoTomeAndPrincipe => "ST", "Sao Tome and Principe";
    SaudiArabia => "SA", "Saudi Arabia";
    Senegal => "SN", "Senegal";
    Serbia => "RS", "Serbia";
    Seychelles => "SC", "Seychelles";
    SierraLeone => "SL", "Sierra Leone";
    Singapore => "SG", "Singapore";
    Slovakia => "SK", "Slovakia";
    Slovenia => "SI", "Slovenia";
    SolomonIslands => "SB", "Solomon Islands";
    Somalia => "SO", "Somalia";
    SouthAfrica => "ZA", "South Africa";
    SouthKorea => "KR", "South Korea";
    SouthSudan => "SS", "South Sudan";
    Spain => "ES", "Spain";
    SriLanka => "LK", "Sri Lanka";
    Sudan => "SD", "Sudan";
    Suriname => "SR", "Suriname";
    Sweden => "SE", "Sweden";
    Switzerland => "CH", "Switzerland";
    Syria => "SY", "Syria";
    Taiwan => "TW", "Taiwan";
    Tajikistan => "TJ", "Tajikistan";
    Tanzania => "TZ", "Tanzania";
    Thailand => "TH", "Thailand";
    TimorLeste => "TL", "Timor-Leste";
    Togo => "TG", "Togo";
    Tonga => "TO", "Tonga";
    TrinidadAndTobago => "TT", "Trinidad and Tobago";
    Tunisia => "TN", "Tunisia";
    Turkey => "TR", "Turkey";
    Turkmenistan => "TM", "Turkmenistan";
    Tuvalu => "TV", "Tuvalu";
    Uganda => "UG", "Uganda";
    Ukraine => "UA", "Ukraine";
    UnitedArabEmirates => "AE", "United Arab Emirates";
    UnitedKingdom => "GB", "United Kingdom";
    UnitedStates => "US", "United States";
    Uruguay => "UY", "Uruguay";
    Uzbekistan => "UZ", "Uzbekistan";
    Vanuatu => "VU", "Vanuatu";
    VaticanCity => "VA", "Vatican City";
    Venezuela => "VE", "Venezuela";
    Vietnam => "VN", "Vietnam";
    Yemen => "YE", "Yemen";
    Zambia => "ZM", "Zambia";
    Zimbabwe => "ZW", "Zimbabwe";
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Country {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Country {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CodeVisitor;

        impl Visitor<'_> for CodeVisitor {
            type Value = Country;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an ISO 3166-1 alpha-2 country code")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Country, E> {
                Country::from_code(value)
                    .ok_or_else(|| E::custom(format!("unknown country code `{value}`")))
            }
        }

        deserializer.deserialize_str(CodeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::Country;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique_two_letter_uppercase() {
        let mut seen = HashSet::new();
        for country in Country::ALL {
            let code = country.code();
            assert_eq!(code.len(), 2, "bad code for {}", country.name());
            assert!(code.chars().all(|c| c.is_ascii_uppercase()));
            assert!(seen.insert(code), "duplicate code {code}");
        }
    }

    #[test]
    fn from_code_roundtrips_every_entry() {
        for country in Country::ALL {
            assert_eq!(Country::from_code(country.code()), Some(*country));
        }
        assert_eq!(Country::from_code("XX"), None);
    }

    #[test]
    fn serializes_as_alpha2_code() {
        assert_eq!(serde_json::to_string(&Country::Germany).unwrap(), "\"DE\"");
        let decoded: Country = serde_json::from_str("\"GB\"").unwrap();
        assert_eq!(decoded, Country::UnitedKingdom);
    }

    #[test]
    fn table_covers_the_expected_range() {
        assert!(Country::ALL.len() >= 190);
    }
}
