//! Declarative pattern catalogs consumed by the dialect detector, the type
//! inferencer, and the field-mapping generator.
//!
//! Everything in this module is data. Catalog entries are plain
//! `(target, patterns)` records kept in slices so iteration order is stable;
//! first match wins everywhere they are consulted, so order is significant.
//! Adding a dialect field or a generic field is a matter of appending an entry
//! here; the scoring code never names individual fields.
//!
//! Header and value patterns are matched case-insensitively. The compiled
//! forms are built once on first use and shared for the life of the process.

use std::{fmt, sync::OnceLock};

use heck::ToTitleCase;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::inference::DataType;

/// A normalized target field and the header patterns that select it.
#[derive(Debug, Clone, Copy)]
pub struct FieldPatterns {
    pub target: &'static str,
    pub patterns: &'static [&'static str],
}

const fn field(target: &'static str, patterns: &'static [&'static str]) -> FieldPatterns {
    FieldPatterns { target, patterns }
}

/// Known external property-management export layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    TenantData,
    PropertyData,
    FinancialData,
    MaintenanceData,
    ReportingData,
    RentRoll,
    LeaseData,
    UnitData,
}

impl Dialect {
    /// Detection order. Ties in dialect scoring resolve to the earlier entry.
    pub const ALL: [Dialect; 8] = [
        Dialect::TenantData,
        Dialect::PropertyData,
        Dialect::FinancialData,
        Dialect::MaintenanceData,
        Dialect::ReportingData,
        Dialect::RentRoll,
        Dialect::LeaseData,
        Dialect::UnitData,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Dialect::TenantData => "tenant_data",
            Dialect::PropertyData => "property_data",
            Dialect::FinancialData => "financial_data",
            Dialect::MaintenanceData => "maintenance_data",
            Dialect::ReportingData => "reporting_data",
            Dialect::RentRoll => "rent_roll",
            Dialect::LeaseData => "lease_data",
            Dialect::UnitData => "unit_data",
        }
    }

    /// Human label, e.g. `Tenant Data` for `tenant_data`.
    pub fn title(self) -> String {
        self.id().to_title_case()
    }

    pub fn from_id(id: &str) -> Option<Self> {
        let wanted = id.trim();
        Self::ALL
            .into_iter()
            .find(|dialect| dialect.id().eq_ignore_ascii_case(wanted))
    }

    pub fn fields(self) -> &'static [FieldPatterns] {
        match self {
            Dialect::TenantData => TENANT_DATA_FIELDS,
            Dialect::PropertyData => PROPERTY_DATA_FIELDS,
            Dialect::FinancialData => FINANCIAL_DATA_FIELDS,
            Dialect::MaintenanceData => MAINTENANCE_DATA_FIELDS,
            Dialect::ReportingData => REPORTING_DATA_FIELDS,
            Dialect::RentRoll => RENT_ROLL_FIELDS,
            Dialect::LeaseData => LEASE_DATA_FIELDS,
            Dialect::UnitData => UNIT_DATA_FIELDS,
        }
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Targets whose presence marks a mapping as required.
pub const REQUIRED_FIELDS: &[&str] = &[
    "property_name",
    "tenant_name",
    "unit_number",
    "lease_start",
    "rent_amount",
    "email",
];

/// Targets an import cannot proceed without; absence triggers a recommendation.
pub const ESSENTIAL_FIELDS: &[&str] = &["property_name", "tenant_name", "unit_number"];

pub fn is_required_target(target: &str) -> bool {
    REQUIRED_FIELDS.contains(&target)
}

/// Product and system names that show up in headers of known exports.
pub const DIALECT_MARKERS: &[&str] = &[
    r"yardi",
    r"voyager",
    r"pms[\s_-]*export",
    r"rent[\s_-]*cafe",
];

/// Uppercase letters followed by digits, e.g. `T0001234` or `BLDG12`.
pub const RECORD_CODE_SHAPE: &str = r"^[A-Z]+[0-9]+$";

/// Six to eight digit numeric identifiers.
pub const NUMERIC_ID_SHAPE: &str = r"^[0-9]{6,8}$";

const UNIT_NUMBER: &[&str] = &[
    r"^unit([\s_-]*(number|no\.?|num|#|code))?$",
    r"^apt([\s_-]*(number|no\.?|#))?$",
];
const TENANT_NAME: &[&str] = &[
    r"^(tenant|resident)[\s_-]*name$",
    r"^tenant$",
    r"^resident$",
];
const LEASE_START: &[&str] = &[
    r"^lease[\s_-]*(start|from|begin)([\s_-]*date)?$",
    r"^move[\s_-]*in([\s_-]*date)?$",
];
const LEASE_END: &[&str] = &[
    r"^lease[\s_-]*(end|to|expiration|expires)([\s_-]*date)?$",
    r"^move[\s_-]*out([\s_-]*date)?$",
];
const RENT_AMOUNT: &[&str] = &[r"^(monthly[\s_-]*|current[\s_-]*|lease[\s_-]*)?rent([\s_-]*amount)?$"];
const PROPERTY_CODE: &[&str] = &[r"^prop(erty)?[\s_-]*(code|id)$", r"^scode$", r"^hprop$"];
const SECURITY_DEPOSIT: &[&str] = &[
    r"^(security[\s_-]*)?deposits?$",
    r"^deposit[\s_-]*(held|on[\s_-]*hand)$",
];
const SQUARE_FEET: &[&str] = &[
    r"^(total[\s_-]*)?sq(uare)?[\s_-]*f(ee|oo)?t(age)?$",
    r"^sqft$",
    r"^rentable[\s_-]*area$",
];
const UNIT_TYPE: &[&str] = &[r"^unit[\s_-]*type$", r"^floor[\s_-]*plan$"];
const MARKET_RENT: &[&str] = &[r"^market([\s_-]*rent)?$"];

const TENANT_DATA_FIELDS: &[FieldPatterns] = &[
    field(
        "tenant_code",
        &[r"^t(enant)?[\s_-]*code$", r"^tcode$", r"^resident[\s_-]*code$"],
    ),
    field("tenant_name", TENANT_NAME),
    field("first_name", &[r"^first[\s_-]*name$", r"^fname$"]),
    field("last_name", &[r"^last[\s_-]*name$", r"^lname$", r"^surname$"]),
    field("unit_number", UNIT_NUMBER),
    field(
        "email",
        &[r"^e[\s_-]*mail([\s_-]*address)?$", r"^tenant[\s_-]*e[\s_-]*mail$"],
    ),
    field(
        "phone",
        &[
            r"^(tenant[\s_-]*)?phone([\s_-]*(number|no\.?))?$",
            r"^(cell|mobile|home|work)[\s_-]*phone$",
            r"^telephone$",
        ],
    ),
    field("lease_start", LEASE_START),
    field("lease_end", LEASE_END),
    field("rent_amount", RENT_AMOUNT),
    field(
        "balance",
        &[r"^(current[\s_-]*|total[\s_-]*)?balance$", r"^amount[\s_-]*due$"],
    ),
    field("tenant_status", &[r"^(tenant|resident)[\s_-]*status$"]),
];

const PROPERTY_DATA_FIELDS: &[FieldPatterns] = &[
    field("property_code", PROPERTY_CODE),
    field(
        "property_name",
        &[r"^prop(erty)?[\s_-]*name$", r"^building[\s_-]*name$", r"^property$"],
    ),
    field(
        "property_address",
        &[
            r"^(property[\s_-]*)?address([\s_-]*1)?$",
            r"^street([\s_-]*address)?$",
        ],
    ),
    field("city", &[r"^city$"]),
    field("state", &[r"^state$", r"^province$"]),
    field("zip_code", &[r"^zip([\s_-]*code)?$", r"^postal[\s_-]*code$"]),
    field("property_type", &[r"^prop(erty)?[\s_-]*type$"]),
    field(
        "unit_count",
        &[
            r"^(total[\s_-]*)?units$",
            r"^unit[\s_-]*count$",
            r"^(number|no\.?|#)[\s_-]*of[\s_-]*units$",
        ],
    ),
    field("square_feet", SQUARE_FEET),
    field("year_built", &[r"^year[\s_-]*built$"]),
    field("manager", &[r"^(property[\s_-]*)?manager$"]),
];

const FINANCIAL_DATA_FIELDS: &[FieldPatterns] = &[
    field(
        "gl_account",
        &[
            r"^gl[\s_-]*(account|acct|code)$",
            r"^account[\s_-]*(number|code|no\.?)$",
        ],
    ),
    field("account_name", &[r"^account[\s_-]*(name|description)$"]),
    field(
        "transaction_date",
        &[r"^(transaction|trans|posting|post)[\s_-]*date$", r"^date$"],
    ),
    field(
        "amount",
        &[r"^amount$", r"^(transaction|trans)[\s_-]*amount$", r"^total$"],
    ),
    field("debit", &[r"^debit$", r"^dr$"]),
    field("credit", &[r"^credit$", r"^cr$"]),
    field("description", &[r"^description$", r"^memo$", r"^notes?$"]),
    field(
        "reference",
        &[
            r"^ref(erence)?([\s_-]*(number|no\.?|#))?$",
            r"^check[\s_-]*(number|no\.?|#)$",
            r"^control$",
        ],
    ),
    field("period", &[r"^(fiscal[\s_-]*)?period$", r"^post[\s_-]*month$"]),
    field("property_code", PROPERTY_CODE),
];

const MAINTENANCE_DATA_FIELDS: &[FieldPatterns] = &[
    field(
        "work_order_number",
        &[
            r"^(work[\s_-]*order|wo)([\s_-]*(number|no\.?|#|id))?$",
            r"^ticket([\s_-]*(number|no\.?|#|id))?$",
        ],
    ),
    field(
        "request_date",
        &[
            r"^(request(ed)?|call|open(ed)?)[\s_-]*date$",
            r"^date[\s_-]*(requested|opened)$",
        ],
    ),
    field(
        "completed_date",
        &[
            r"^(completed?|closed?|finish(ed)?)[\s_-]*date$",
            r"^date[\s_-]*(completed|closed)$",
        ],
    ),
    field(
        "category",
        &[r"^(work[\s_-]*)?category$", r"^(problem|issue)[\s_-]*type$"],
    ),
    field("priority", &[r"^priority$", r"^urgency$"]),
    field("status", &[r"^(work[\s_-]*order[\s_-]*)?status$"]),
    field(
        "vendor",
        &[r"^vendor([\s_-]*name)?$", r"^contractor$", r"^assigned[\s_-]*to$"],
    ),
    field(
        "cost",
        &[r"^(total[\s_-]*)?cost$", r"^(labor|material|parts)[\s_-]*cost$"],
    ),
    field(
        "description",
        &[r"^(problem[\s_-]*)?description$", r"^brief[\s_-]*desc(ription)?$"],
    ),
    field("unit_number", UNIT_NUMBER),
];

const REPORTING_DATA_FIELDS: &[FieldPatterns] = &[
    field(
        "report_date",
        &[
            r"report[\s_-]*generated",
            r"export[\s_-]*date",
            r"^report[\s_-]*date$",
            r"^as[\s_-]*of([\s_-]*date)?$",
        ],
    ),
    field("period_start", &[r"^period[\s_-]*start$", r"^from[\s_-]*date$"]),
    field("period_end", &[r"^period[\s_-]*end$", r"^to[\s_-]*date$"]),
    field("property_code", PROPERTY_CODE),
    field(
        "occupancy_rate",
        &[r"^occupancy([\s_-]*(rate|%|percent))?$", r"^occ[\s_-]*%$"],
    ),
    field("vacancy_rate", &[r"^vacancy([\s_-]*(rate|%|percent))?$"]),
    field("total_units", &[r"^(total[\s_-]*)?units$", r"^unit[\s_-]*count$"]),
    field("occupied_units", &[r"^occupied([\s_-]*units)?$"]),
    field("vacant_units", &[r"^vacant([\s_-]*units)?$"]),
    field(
        "gross_potential_rent",
        &[r"^gross[\s_-]*potential([\s_-]*rent)?$", r"^gpr$"],
    ),
];

const RENT_ROLL_FIELDS: &[FieldPatterns] = &[
    field("unit_number", UNIT_NUMBER),
    field("unit_type", UNIT_TYPE),
    field(
        "tenant_name",
        &[r"^(tenant|resident)([\s_-]*name)?$", r"^name$"],
    ),
    field("market_rent", MARKET_RENT),
    field(
        "rent_amount",
        &[
            r"^(actual[\s_-]*|lease[\s_-]*|current[\s_-]*|monthly[\s_-]*)?rent([\s_-]*amount)?$",
            r"^charges?$",
        ],
    ),
    field("security_deposit", SECURITY_DEPOSIT),
    field("lease_start", LEASE_START),
    field("lease_end", LEASE_END),
    field("balance", &[r"^balance$", r"^past[\s_-]*due$"]),
    field("square_feet", SQUARE_FEET),
];

const LEASE_DATA_FIELDS: &[FieldPatterns] = &[
    field("lease_id", &[r"^lease[\s_-]*(id|number|no\.?|code)$"]),
    field("tenant_name", TENANT_NAME),
    field("unit_number", UNIT_NUMBER),
    field("lease_start", LEASE_START),
    field("lease_end", LEASE_END),
    field("lease_term", &[r"^(lease[\s_-]*)?term([\s_-]*months)?$"]),
    field("rent_amount", RENT_AMOUNT),
    field("security_deposit", SECURITY_DEPOSIT),
    field("lease_type", &[r"^lease[\s_-]*type$"]),
    field(
        "renewal_date",
        &[r"^renewal([\s_-]*date)?$", r"^notice[\s_-]*date$"],
    ),
];

const UNIT_DATA_FIELDS: &[FieldPatterns] = &[
    field("unit_number", UNIT_NUMBER),
    field("property_code", PROPERTY_CODE),
    field("unit_type", UNIT_TYPE),
    field("bedrooms", &[r"^(bed(room)?s?|br)$"]),
    field("bathrooms", &[r"^(bath(room)?s?|ba)$"]),
    field("square_feet", SQUARE_FEET),
    field("market_rent", MARKET_RENT),
    field(
        "unit_status",
        &[r"^unit[\s_-]*status$", r"^occupancy[\s_-]*status$"],
    ),
    field("floor", &[r"^floor([\s_-]*(number|no\.?))?$"]),
    field(
        "ready_date",
        &[r"^(make[\s_-]*)?ready[\s_-]*date$", r"^available([\s_-]*date)?$"],
    ),
];

/// Dialect-independent fallback catalog.
pub const GENERIC_FIELDS: &[FieldPatterns] = &[
    field(
        "property_name",
        &[
            r"^prop(erty)?[\s_-]*name$",
            r"^building[\s_-]*name$",
            r"^property$",
            r"^building$",
        ],
    ),
    field(
        "property_address",
        &[
            r"^(property[\s_-]*)?address([\s_-]*(line[\s_-]*)?1)?$",
            r"^street([\s_-]*address)?$",
        ],
    ),
    field("property_id", &[r"^prop(erty)?[\s_-]*(id|code)$"]),
    field("property_type", &[r"^prop(erty)?[\s_-]*type$"]),
    field(
        "unit_number",
        &[
            r"^unit([\s_-]*(number|no\.?|num|#))?$",
            r"^apt([\s_-]*(number|no\.?|#))?$",
            r"^apartment([\s_-]*(number|no\.?|#))?$",
            r"^suite$",
        ],
    ),
    field("unit_type", UNIT_TYPE),
    field(
        "tenant_name",
        &[
            r"^(tenant|resident|occupant)[\s_-]*name$",
            r"^tenant$",
            r"^resident$",
            r"^full[\s_-]*name$",
            r"^name$",
        ],
    ),
    field("tenant_id", &[r"^(tenant|resident)[\s_-]*(id|code|number)$"]),
    field("first_name", &[r"^first[\s_-]*name$", r"^fname$"]),
    field("last_name", &[r"^last[\s_-]*name$", r"^lname$", r"^surname$"]),
    field("email", &[r"^e[\s_-]*mail([\s_-]*address)?$", r"email"]),
    field(
        "phone",
        &[
            r"^(phone|telephone|tel)([\s_-]*(number|no\.?|#))?$",
            r"^(cell|mobile|home|work)([\s_-]*phone)?$",
            r"phone",
        ],
    ),
    field(
        "lease_start",
        &[
            r"^lease[\s_-]*(start|begin|from)([\s_-]*date)?$",
            r"^move[\s_-]*in([\s_-]*date)?$",
            r"^start[\s_-]*date$",
        ],
    ),
    field(
        "lease_end",
        &[
            r"^lease[\s_-]*(end|to|expiration|expires)([\s_-]*date)?$",
            r"^move[\s_-]*out([\s_-]*date)?$",
            r"^end[\s_-]*date$",
        ],
    ),
    field(
        "rent_amount",
        &[
            r"^(monthly[\s_-]*|current[\s_-]*|base[\s_-]*)?rent([\s_-]*amount)?$",
            r"(^|[\s_-])rent([\s_-]|$)",
        ],
    ),
    field("security_deposit", &[r"deposit"]),
    field("balance", &[r"balance$", r"^amount[\s_-]*due$"]),
    field("amount", &[r"^amount$", r"^total([\s_-]*amount)?$"]),
    field(
        "date",
        &[r"^date$", r"^(transaction|posting|payment)[\s_-]*date$"],
    ),
    field("description", &[r"^description$", r"^desc$", r"^memo$", r"^notes?$"]),
    field("status", &[r"status$"]),
    field("city", &[r"^city$"]),
    field("state", &[r"^state$", r"^province$"]),
    field("zip_code", &[r"^zip([\s_-]*code)?$", r"^postal[\s_-]*code$"]),
    field("bedrooms", &[r"^(bed(room)?s?|br)$"]),
    field("bathrooms", &[r"^(bath(room)?s?|ba)$"]),
    field("square_feet", SQUARE_FEET),
    field(
        "maintenance_request",
        &[r"^(maintenance|work[\s_-]*order|repair)([\s_-]*(request|id|number))?$"],
    ),
];

/// Cell-value shapes per scalar type, in inference priority order.
pub const VALUE_SHAPES: &[(DataType, &[&str])] = &[
    (DataType::Email, &[r"^[^\s@]+@[^\s@]+\.[^\s@]+$"]),
    (
        DataType::Phone,
        &[
            r"^\+?1?[\s.-]?\(?[0-9]{3}\)?[\s.-]?[0-9]{3}[\s.-]?[0-9]{4}$",
            r"^\+[0-9]{1,3}[\s.-]?[0-9]{4,14}$",
        ],
    ),
    (
        DataType::Currency,
        &[
            r"^-?\$\s?-?[0-9]{1,3}(,[0-9]{3})*(\.[0-9]{1,2})?$",
            r"^-?\$\s?-?[0-9]+(\.[0-9]{1,2})?$",
            r"^\(?-?[0-9]{1,3}(,[0-9]{3})*\.[0-9]{2}\)?$",
            r"^-?[0-9]+\.[0-9]{2}$",
        ],
    ),
    (
        DataType::Date,
        &[
            r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}$",
            r"^[0-9]{4}/[0-9]{1,2}/[0-9]{1,2}$",
            r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}$",
            r"^[0-9]{1,2}-[0-9]{1,2}-[0-9]{4}$",
            r"^[a-z]{3,9}\.?\s+[0-9]{1,2},?\s+[0-9]{4}$",
            r"^[0-9]{4}-[0-9]{2}-[0-9]{2}[t\s][0-9]{2}:[0-9]{2}(:[0-9]{2})?",
        ],
    ),
    (
        DataType::Number,
        &[
            r"^-?[0-9]+$",
            r"^-?[0-9]*\.[0-9]+$",
            r"^-?[0-9]{1,3}(,[0-9]{3})+(\.[0-9]+)?$",
        ],
    ),
    (
        DataType::Boolean,
        &[r"^(true|false)$", r"^(yes|no)$", r"^(y|n|t|f)$", r"^(0|1)$"],
    ),
    (
        DataType::Address,
        &[
            r"^[0-9]+[a-z]?\s+([a-z0-9.'-]+\s+)+(st|street|ave|avenue|rd|road|blvd|boulevard|dr|drive|ln|lane|ct|court|way|pl|place|pkwy|parkway|cir|circle|ter|terrace|hwy|highway)\b",
            r"^p\.?\s?o\.?\s+box\s+[0-9]+",
        ],
    ),
    (DataType::String, &[r".*"]),
];

/// A compiled pattern that remembers the source it was built from.
#[derive(Debug)]
pub struct CompiledPattern {
    pub source: &'static str,
    pub regex: Regex,
}

impl CompiledPattern {
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

#[derive(Debug)]
pub struct CompiledField {
    pub target: &'static str,
    pub patterns: Vec<CompiledPattern>,
}

impl CompiledField {
    /// First pattern of this field matching `header`.
    pub fn find(&self, header: &str) -> Option<&CompiledPattern> {
        self.patterns.iter().find(|pattern| pattern.is_match(header))
    }
}

/// Result of resolving a header against a field catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMatch {
    pub target: &'static str,
    pub pattern: &'static str,
}

struct Compiled {
    dialects: Vec<Vec<CompiledField>>,
    generic: Vec<CompiledField>,
    shapes: Vec<(DataType, Vec<CompiledPattern>)>,
    markers: Vec<CompiledPattern>,
    record_code: Option<Regex>,
    numeric_id: Option<Regex>,
}

static COMPILED: OnceLock<Compiled> = OnceLock::new();

fn compiled() -> &'static Compiled {
    COMPILED.get_or_init(|| {
        let compiled = Compiled {
            dialects: Dialect::ALL
                .iter()
                .map(|dialect| compile_fields(dialect.fields()))
                .collect(),
            generic: compile_fields(GENERIC_FIELDS),
            shapes: VALUE_SHAPES
                .iter()
                .map(|&(data_type, patterns)| (data_type, compile_patterns(patterns)))
                .collect(),
            markers: compile_patterns(DIALECT_MARKERS),
            record_code: compile_exact(RECORD_CODE_SHAPE),
            numeric_id: compile_exact(NUMERIC_ID_SHAPE),
        };
        debug!(
            "Compiled pattern catalogs: {} dialect(s), {} generic field(s), {} value shape(s)",
            compiled.dialects.len(),
            compiled.generic.len(),
            compiled.shapes.len()
        );
        compiled
    })
}

fn compile_fields(fields: &'static [FieldPatterns]) -> Vec<CompiledField> {
    fields
        .iter()
        .map(|entry| CompiledField {
            target: entry.target,
            patterns: compile_patterns(entry.patterns),
        })
        .collect()
}

fn compile_patterns(patterns: &'static [&'static str]) -> Vec<CompiledPattern> {
    patterns
        .iter()
        .filter_map(|&source| {
            match RegexBuilder::new(source).case_insensitive(true).build() {
                Ok(regex) => Some(CompiledPattern { source, regex }),
                Err(err) => {
                    warn!("Skipping invalid catalog pattern '{source}': {err}");
                    None
                }
            }
        })
        .collect()
}

fn compile_exact(source: &str) -> Option<Regex> {
    match Regex::new(source) {
        Ok(regex) => Some(regex),
        Err(err) => {
            warn!("Skipping invalid shape pattern '{source}': {err}");
            None
        }
    }
}

pub fn dialect_fields(dialect: Dialect) -> &'static [CompiledField] {
    compiled()
        .dialects
        .get(dialect.index())
        .map(Vec::as_slice)
        .unwrap_or_default()
}

pub fn generic_fields() -> &'static [CompiledField] {
    &compiled().generic
}

pub fn dialect_markers() -> &'static [CompiledPattern] {
    &compiled().markers
}

/// Compiled value patterns for `data_type`; empty when the type has none.
pub fn value_patterns(data_type: DataType) -> &'static [CompiledPattern] {
    compiled()
        .shapes
        .iter()
        .find(|(candidate, _)| *candidate == data_type)
        .map(|(_, patterns)| patterns.as_slice())
        .unwrap_or_default()
}

pub fn is_record_code(value: &str) -> bool {
    compiled()
        .record_code
        .as_ref()
        .is_some_and(|regex| regex.is_match(value))
}

pub fn is_numeric_id(value: &str) -> bool {
    compiled()
        .numeric_id
        .as_ref()
        .is_some_and(|regex| regex.is_match(value))
}

/// Resolves `header` against `fields`, walking fields in catalog order.
pub fn match_field(fields: &'static [CompiledField], header: &str) -> Option<FieldMatch> {
    let header = header.trim();
    if header.is_empty() {
        return None;
    }
    fields.iter().find_map(|field| {
        field.find(header).map(|pattern| FieldMatch {
            target: field.target,
            pattern: pattern.source,
        })
    })
}

pub fn generic_target_names() -> impl Iterator<Item = &'static str> {
    GENERIC_FIELDS.iter().map(|entry| entry.target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_pattern_compiles() {
        for dialect in Dialect::ALL {
            for entry in dialect.fields() {
                for source in entry.patterns {
                    assert!(
                        RegexBuilder::new(source).case_insensitive(true).build().is_ok(),
                        "{dialect}:{} pattern {source} failed to compile",
                        entry.target
                    );
                }
            }
        }
        for entry in GENERIC_FIELDS {
            for source in entry.patterns {
                assert!(Regex::new(source).is_ok(), "generic pattern {source}");
            }
        }
        for (data_type, patterns) in VALUE_SHAPES {
            for source in *patterns {
                assert!(Regex::new(source).is_ok(), "{data_type:?} pattern {source}");
            }
        }
    }

    #[test]
    fn dialect_ids_round_trip_and_title_case() {
        for dialect in Dialect::ALL {
            assert_eq!(Dialect::from_id(dialect.id()), Some(dialect));
        }
        assert_eq!(Dialect::RentRoll.title(), "Rent Roll");
        assert_eq!(Dialect::from_id("unknown"), None);
    }

    #[test]
    fn generic_targets_are_unique() {
        let mut names = generic_target_names().collect::<Vec<_>>();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn match_field_is_case_insensitive_and_records_source() {
        let found = match_field(generic_fields(), "  TENANT NAME ").expect("tenant match");
        assert_eq!(found.target, "tenant_name");
        assert_eq!(found.pattern, r"^(tenant|resident|occupant)[\s_-]*name$");
        assert!(match_field(generic_fields(), "").is_none());
        assert!(match_field(generic_fields(), "zzz").is_none());
    }

    #[test]
    fn rent_fallback_needs_a_whole_word() {
        let target = |header: &str| match_field(generic_fields(), header).map(|found| found.target);
        assert_eq!(target("Current Balance"), Some("balance"));
        assert_eq!(target("Parent Company"), None);
        assert_eq!(target("Currently Occupied"), None);
        assert_eq!(target("Current Address"), None);
        assert_eq!(target("Rent Due"), Some("rent_amount"));
        assert_eq!(target("past_rent_total"), Some("rent_amount"));
    }

    #[test]
    fn record_code_shape_requires_uppercase() {
        assert!(is_record_code("T0001234"));
        assert!(!is_record_code("t0001234"));
        assert!(!is_record_code("1234"));
        assert!(is_numeric_id("1234567"));
        assert!(!is_numeric_id("12345"));
    }
}
