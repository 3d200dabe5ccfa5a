//! Built-in country table
//!
//! City records store a single byte per country; this table maps it to
//! codes, name and continent. The byte order is fixed by the file format.

/// One entry of the country table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code (or a pseudo-code such as `A1`)
    pub code: &'static str,
    /// ISO 3166-1 alpha-3 code
    pub code3: &'static str,
    /// English name
    pub name: &'static str,
    /// Two-letter continent code
    pub continent: &'static str,
}

/// Table index used by United States records
pub const US_INDEX: u8 = 225;

/// Look up the country stored as `index` in a City record
#[inline]
pub fn by_index(index: u8) -> &'static Country {
    &COUNTRIES[index as usize]
}

/// Table index of a two-letter code, if present
pub fn index_of(code: &str) -> Option<u8> {
    COUNTRIES
        .iter()
        .position(|c| c.code == code)
        .map(|i| i as u8)
}

const fn c(
    code: &'static str,
    code3: &'static str,
    name: &'static str,
    continent: &'static str,
) -> Country {
    Country {
        code,
        code3,
        name,
        continent,
    }
}

static COUNTRIES: [Country; 256] = [
    c("--", "--", "N/A", "--"),
    c("AP", "AP", "Asia/Pacific Region", "AS"),
    c("EU", "EU", "Europe", "EU"),
    c("AD", "AND", "Andorra", "EU"),
    c("AE", "ARE", "United Arab Emirates", "AS"),
    c("AF", "AFG", "Afghanistan", "AS"),
    c("AG", "ATG", "Antigua and Barbuda", "NA"),
    c("AI", "AIA", "Anguilla", "NA"),
    c("AL", "ALB", "Albania", "EU"),
    c("AM", "ARM", "Armenia", "AS"),
    c("CW", "CUW", "Curacao", "NA"),
    c("AO", "AGO", "Angola", "AF"),
    c("AQ", "ATA", "Antarctica", "AN"),
    c("AR", "ARG", "Argentina", "SA"),
    c("AS", "ASM", "American Samoa", "OC"),
    c("AT", "AUT", "Austria", "EU"),
    c("AU", "AUS", "Australia", "OC"),
    c("AW", "ABW", "Aruba", "NA"),
    c("AZ", "AZE", "Azerbaijan", "AS"),
    c("BA", "BIH", "Bosnia and Herzegovina", "EU"),
    c("BB", "BRB", "Barbados", "NA"),
    c("BD", "BGD", "Bangladesh", "AS"),
    c("BE", "BEL", "Belgium", "EU"),
    c("BF", "BFA", "Burkina Faso", "AF"),
    c("BG", "BGR", "Bulgaria", "EU"),
    c("BH", "BHR", "Bahrain", "AS"),
    c("BI", "BDI", "Burundi", "AF"),
    c("BJ", "BEN", "Benin", "AF"),
    c("BM", "BMU", "Bermuda", "NA"),
    c("BN", "BRN", "Brunei Darussalam", "AS"),
    c("BO", "BOL", "Bolivia", "SA"),
    c("BR", "BRA", "Brazil", "SA"),
    c("BS", "BHS", "Bahamas", "NA"),
    c("BT", "BTN", "Bhutan", "AS"),
    c("BV", "BVT", "Bouvet Island", "AN"),
    c("BW", "BWA", "Botswana", "AF"),
    c("BY", "BLR", "Belarus", "EU"),
    c("BZ", "BLZ", "Belize", "NA"),
    c("CA", "CAN", "Canada", "NA"),
    c("CC", "CCK", "Cocos (Keeling) Islands", "AS"),
    c("CD", "COD", "Congo, The Democratic Republic of the", "AF"),
    c("CF", "CAF", "Central African Republic", "AF"),
    c("CG", "COG", "Congo", "AF"),
    c("CH", "CHE", "Switzerland", "EU"),
    c("CI", "CIV", "Cote D'Ivoire", "AF"),
    c("CK", "COK", "Cook Islands", "OC"),
    c("CL", "CHL", "Chile", "SA"),
    c("CM", "CMR", "Cameroon", "AF"),
    c("CN", "CHN", "China", "AS"),
    c("CO", "COL", "Colombia", "SA"),
    c("CR", "CRI", "Costa Rica", "NA"),
    c("CU", "CUB", "Cuba", "NA"),
    c("CV", "CPV", "Cape Verde", "AF"),
    c("CX", "CXR", "Christmas Island", "AS"),
    c("CY", "CYP", "Cyprus", "AS"),
    c("CZ", "CZE", "Czech Republic", "EU"),
    c("DE", "DEU", "Germany", "EU"),
    c("DJ", "DJI", "Djibouti", "AF"),
    c("DK", "DNK", "Denmark", "EU"),
    c("DM", "DMA", "Dominica", "NA"),
    c("DO", "DOM", "Dominican Republic", "NA"),
    c("DZ", "DZA", "Algeria", "AF"),
    c("EC", "ECU", "Ecuador", "SA"),
    c("EE", "EST", "Estonia", "EU"),
    c("EG", "EGY", "Egypt", "AF"),
    c("EH", "ESH", "Western Sahara", "AF"),
    c("ER", "ERI", "Eritrea", "AF"),
    c("ES", "ESP", "Spain", "EU"),
    c("ET", "ETH", "Ethiopia", "AF"),
    c("FI", "FIN", "Finland", "EU"),
    c("FJ", "FJI", "Fiji", "OC"),
    c("FK", "FLK", "Falkland Islands (Malvinas)", "SA"),
    c("FM", "FSM", "Micronesia, Federated States of", "OC"),
    c("FO", "FRO", "Faroe Islands", "EU"),
    c("FR", "FRA", "France", "EU"),
    c("SX", "SXM", "Sint Maarten (Dutch part)", "NA"),
    c("GA", "GAB", "Gabon", "AF"),
    c("GB", "GBR", "United Kingdom", "EU"),
    c("GD", "GRD", "Grenada", "NA"),
    c("GE", "GEO", "Georgia", "AS"),
    c("GF", "GUF", "French Guiana", "SA"),
    c("GH", "GHA", "Ghana", "AF"),
    c("GI", "GIB", "Gibraltar", "EU"),
    c("GL", "GRL", "Greenland", "NA"),
    c("GM", "GMB", "Gambia", "AF"),
    c("GN", "GIN", "Guinea", "AF"),
    c("GP", "GLP", "Guadeloupe", "NA"),
    c("GQ", "GNQ", "Equatorial Guinea", "AF"),
    c("GR", "GRC", "Greece", "EU"),
    c("GS", "SGS", "South Georgia and the South Sandwich Islands", "AN"),
    c("GT", "GTM", "Guatemala", "NA"),
    c("GU", "GUM", "Guam", "OC"),
    c("GW", "GNB", "Guinea-Bissau", "AF"),
    c("GY", "GUY", "Guyana", "SA"),
    c("HK", "HKG", "Hong Kong", "AS"),
    c("HM", "HMD", "Heard Island and McDonald Islands", "AN"),
    c("HN", "HND", "Honduras", "NA"),
    c("HR", "HRV", "Croatia", "EU"),
    c("HT", "HTI", "Haiti", "NA"),
    c("HU", "HUN", "Hungary", "EU"),
    c("ID", "IDN", "Indonesia", "AS"),
    c("IE", "IRL", "Ireland", "EU"),
    c("IL", "ISR", "Israel", "AS"),
    c("IN", "IND", "India", "AS"),
    c("IO", "IOT", "British Indian Ocean Territory", "AS"),
    c("IQ", "IRQ", "Iraq", "AS"),
    c("IR", "IRN", "Iran, Islamic Republic of", "AS"),
    c("IS", "ISL", "Iceland", "EU"),
    c("IT", "ITA", "Italy", "EU"),
    c("JM", "JAM", "Jamaica", "NA"),
    c("JO", "JOR", "Jordan", "AS"),
    c("JP", "JPN", "Japan", "AS"),
    c("KE", "KEN", "Kenya", "AF"),
    c("KG", "KGZ", "Kyrgyzstan", "AS"),
    c("KH", "KHM", "Cambodia", "AS"),
    c("KI", "KIR", "Kiribati", "OC"),
    c("KM", "COM", "Comoros", "AF"),
    c("KN", "KNA", "Saint Kitts and Nevis", "NA"),
    c("KP", "PRK", "Korea, Democratic People's Republic of", "AS"),
    c("KR", "KOR", "Korea, Republic of", "AS"),
    c("KW", "KWT", "Kuwait", "AS"),
    c("KY", "CYM", "Cayman Islands", "NA"),
    c("KZ", "KAZ", "Kazakhstan", "AS"),
    c("LA", "LAO", "Lao People's Democratic Republic", "AS"),
    c("LB", "LBN", "Lebanon", "AS"),
    c("LC", "LCA", "Saint Lucia", "NA"),
    c("LI", "LIE", "Liechtenstein", "EU"),
    c("LK", "LKA", "Sri Lanka", "AS"),
    c("LR", "LBR", "Liberia", "AF"),
    c("LS", "LSO", "Lesotho", "AF"),
    c("LT", "LTU", "Lithuania", "EU"),
    c("LU", "LUX", "Luxembourg", "EU"),
    c("LV", "LVA", "Latvia", "EU"),
    c("LY", "LBY", "Libya", "AF"),
    c("MA", "MAR", "Morocco", "AF"),
    c("MC", "MCO", "Monaco", "EU"),
    c("MD", "MDA", "Moldova, Republic of", "EU"),
    c("MG", "MDG", "Madagascar", "AF"),
    c("MH", "MHL", "Marshall Islands", "OC"),
    c("MK", "MKD", "Macedonia", "EU"),
    c("ML", "MLI", "Mali", "AF"),
    c("MM", "MMR", "Myanmar", "AS"),
    c("MN", "MNG", "Mongolia", "AS"),
    c("MO", "MAC", "Macau", "AS"),
    c("MP", "MNP", "Northern Mariana Islands", "OC"),
    c("MQ", "MTQ", "Martinique", "NA"),
    c("MR", "MRT", "Mauritania", "AF"),
    c("MS", "MSR", "Montserrat", "NA"),
    c("MT", "MLT", "Malta", "EU"),
    c("MU", "MUS", "Mauritius", "AF"),
    c("MV", "MDV", "Maldives", "AS"),
    c("MW", "MWI", "Malawi", "AF"),
    c("MX", "MEX", "Mexico", "NA"),
    c("MY", "MYS", "Malaysia", "AS"),
    c("MZ", "MOZ", "Mozambique", "AF"),
    c("NA", "NAM", "Namibia", "AF"),
    c("NC", "NCL", "New Caledonia", "OC"),
    c("NE", "NER", "Niger", "AF"),
    c("NF", "NFK", "Norfolk Island", "OC"),
    c("NG", "NGA", "Nigeria", "AF"),
    c("NI", "NIC", "Nicaragua", "NA"),
    c("NL", "NLD", "Netherlands", "EU"),
    c("NO", "NOR", "Norway", "EU"),
    c("NP", "NPL", "Nepal", "AS"),
    c("NR", "NRU", "Nauru", "OC"),
    c("NU", "NIU", "Niue", "OC"),
    c("NZ", "NZL", "New Zealand", "OC"),
    c("OM", "OMN", "Oman", "AS"),
    c("PA", "PAN", "Panama", "NA"),
    c("PE", "PER", "Peru", "SA"),
    c("PF", "PYF", "French Polynesia", "OC"),
    c("PG", "PNG", "Papua New Guinea", "OC"),
    c("PH", "PHL", "Philippines", "AS"),
    c("PK", "PAK", "Pakistan", "AS"),
    c("PL", "POL", "Poland", "EU"),
    c("PM", "SPM", "Saint Pierre and Miquelon", "NA"),
    c("PN", "PCN", "Pitcairn Islands", "OC"),
    c("PR", "PRI", "Puerto Rico", "NA"),
    c("PS", "PSE", "Palestinian Territory", "AS"),
    c("PT", "PRT", "Portugal", "EU"),
    c("PW", "PLW", "Palau", "OC"),
    c("PY", "PRY", "Paraguay", "SA"),
    c("QA", "QAT", "Qatar", "AS"),
    c("RE", "REU", "Reunion", "AF"),
    c("RO", "ROU", "Romania", "EU"),
    c("RU", "RUS", "Russian Federation", "EU"),
    c("RW", "RWA", "Rwanda", "AF"),
    c("SA", "SAU", "Saudi Arabia", "AS"),
    c("SB", "SLB", "Solomon Islands", "OC"),
    c("SC", "SYC", "Seychelles", "AF"),
    c("SD", "SDN", "Sudan", "AF"),
    c("SE", "SWE", "Sweden", "EU"),
    c("SG", "SGP", "Singapore", "AS"),
    c("SH", "SHN", "Saint Helena", "AF"),
    c("SI", "SVN", "Slovenia", "EU"),
    c("SJ", "SJM", "Svalbard and Jan Mayen", "EU"),
    c("SK", "SVK", "Slovakia", "EU"),
    c("SL", "SLE", "Sierra Leone", "AF"),
    c("SM", "SMR", "San Marino", "EU"),
    c("SN", "SEN", "Senegal", "AF"),
    c("SO", "SOM", "Somalia", "AF"),
    c("SR", "SUR", "Suriname", "SA"),
    c("ST", "STP", "Sao Tome and Principe", "AF"),
    c("SV", "SLV", "El Salvador", "NA"),
    c("SY", "SYR", "Syrian Arab Republic", "AS"),
    c("SZ", "SWZ", "Swaziland", "AF"),
    c("TC", "TCA", "Turks and Caicos Islands", "NA"),
    c("TD", "TCD", "Chad", "AF"),
    c("TF", "ATF", "French Southern Territories", "AN"),
    c("TG", "TGO", "Togo", "AF"),
    c("TH", "THA", "Thailand", "AS"),
    c("TJ", "TJK", "Tajikistan", "AS"),
    c("TK", "TKL", "Tokelau", "OC"),
    c("TM", "TKM", "Turkmenistan", "AS"),
    c("TN", "TUN", "Tunisia", "AF"),
    c("TO", "TON", "Tonga", "OC"),
    c("TL", "TLS", "Timor-Leste", "AS"),
    c("TR", "TUR", "Turkey", "EU"),
    c("TT", "TTO", "Trinidad and Tobago", "NA"),
    c("TV", "TUV", "Tuvalu", "OC"),
    c("TW", "TWN", "Taiwan", "AS"),
    c("TZ", "TZA", "Tanzania, United Republic of", "AF"),
    c("UA", "UKR", "Ukraine", "EU"),
    c("UG", "UGA", "Uganda", "AF"),
    c("UM", "UMI", "United States Minor Outlying Islands", "OC"),
    c("US", "USA", "United States", "NA"),
    c("UY", "URY", "Uruguay", "SA"),
    c("UZ", "UZB", "Uzbekistan", "AS"),
    c("VA", "VAT", "Holy See (Vatican City State)", "EU"),
    c("VC", "VCT", "Saint Vincent and the Grenadines", "NA"),
    c("VE", "VEN", "Venezuela", "SA"),
    c("VG", "VGB", "Virgin Islands, British", "NA"),
    c("VI", "VIR", "Virgin Islands, U.S.", "NA"),
    c("VN", "VNM", "Vietnam", "AS"),
    c("VU", "VUT", "Vanuatu", "OC"),
    c("WF", "WLF", "Wallis and Futuna", "OC"),
    c("WS", "WSM", "Samoa", "OC"),
    c("YE", "YEM", "Yemen", "AS"),
    c("YT", "MYT", "Mayotte", "AF"),
    c("RS", "SRB", "Serbia", "EU"),
    c("ZA", "ZAF", "South Africa", "AF"),
    c("ZM", "ZMB", "Zambia", "AF"),
    c("ME", "MNE", "Montenegro", "EU"),
    c("ZW", "ZWE", "Zimbabwe", "AF"),
    c("A1", "A1", "Anonymous Proxy", "--"),
    c("A2", "A2", "Satellite Provider", "--"),
    c("O1", "O1", "Other", "--"),
    c("AX", "ALA", "Aland Islands", "EU"),
    c("GG", "GGY", "Guernsey", "EU"),
    c("IM", "IMN", "Isle of Man", "EU"),
    c("JE", "JEY", "Jersey", "EU"),
    c("BL", "BLM", "Saint Barthelemy", "NA"),
    c("MF", "MAF", "Saint Martin", "NA"),
    c("BQ", "BES", "Bonaire, Sint Eustatius and Saba", "NA"),
    c("SS", "SSD", "South Sudan", "AF"),
    c("O1", "O1", "Other", "--"),
];
