//! Hand-curated reference countries used by the unit tests.
//!
//! Covers every region, populations on both sides of each tier threshold, and
//! a few records that are never eligible.

use crate::domain::Country;

fn country(id: &str, name: &str, region: &str, population: u64, capital: &str) -> Country {
  Country {
    id: id.into(),
    name: name.into(),
    region: region.into(),
    population,
    capital: capital.into(),
    flag_url: format!("https://flagcdn.com/{}.svg", id.to_lowercase()),
  }
}

pub fn seed_countries() -> Vec<Country> {
  vec![
    // Europe
    country("FRA", "France", "Europe", 67_391_582, "Paris"),
    country("DEU", "Germany", "Europe", 83_240_525, "Berlin"),
    country("ISL", "Iceland", "Europe", 366_425, "Reykjavík"),
    country("MCO", "Monaco", "Europe", 39_244, "Monaco"),
    country("PRT", "Portugal", "Europe", 10_305_564, "Lisbon"),
    // Asia
    country("JPN", "Japan", "Asia", 125_836_021, "Tokyo"),
    country("BTN", "Bhutan", "Asia", 771_612, "Thimphu"),
    country("MDV", "Maldives", "Asia", 540_542, "Malé"),
    // Americas
    country("BRA", "Brazil", "Americas", 212_559_409, "Brasília"),
    country("CUW", "Curaçao", "Americas", 155_014, "Willemstad"),
    country("CAN", "Canada", "Americas", 38_005_238, "Ottawa"),
    country("JAM", "Jamaica", "Americas", 2_961_161, "Kingston"),
    // Africa
    country("NGA", "Nigeria", "Africa", 206_139_587, "Abuja"),
    country("KEN", "Kenya", "Africa", 53_771_300, "Nairobi"),
    country("SYC", "Seychelles", "Africa", 98_462, "Victoria"),
    country("MUS", "Mauritius", "Africa", 1_265_740, "Port Louis"),
    // Oceania
    country("AUS", "Australia", "Oceania", 25_687_041, "Canberra"),
    country("NZL", "New Zealand", "Oceania", 5_084_300, "Wellington"),
    country("FJI", "Fiji", "Oceania", 896_444, "Suva"),
    country("PCN", "Pitcairn Islands", "Oceania", 56, "Adamstown"),
    country("TON", "Tonga", "Oceania", 105_697, "Nuku'alofa"),
    // Never eligible
    country("ATA", "Antarctica", "Antarctic", 1_000, ""),
    country("BVT", "Bouvet Island", "Antarctic", 0, ""),
    country("HMD", "Heard Island and McDonald Islands", "Antarctic", 0, "Atlas Cove"),
  ]
}
