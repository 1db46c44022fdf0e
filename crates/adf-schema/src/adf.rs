//! Built-in ADF lead record definitions
//!
//! The tree mirrors an ADF XML lead document: `Lead → ADF → Prospect`, with the
//! prospect holding vehicles, a customer, a vendor and a provider. Keys starting
//! with `@` are XML attributes and `#text` is element text content, following
//! the usual XML-to-tree convention.

use crate::model::{FieldSpec, RecordRule, RecordSchema};
use crate::registry::SchemaRegistry;
use adf_ir::TEXT_KEY;

pub const SCHEMA_NAME: &str = "ADF";
pub const SCHEMA_VERSION: &str = "1.0";
pub const ROOT: &str = "Lead";

pub const PROSPECT_STATUS: &[&str] = &["new", "resend"];
pub const VEHICLE_INTEREST: &[&str] = &["buy", "lease", "sell", "trade-in", "test-drive"];
pub const VEHICLE_STATUS: &[&str] = &["new", "used"];
pub const VEHICLE_CONDITION: &[&str] = &["excellent", "good", "fair", "poor", "unknown"];
pub const ODOMETER_STATUS: &[&str] = &["unknown", "rolledover", "replaced", "original"];
pub const ODOMETER_UNITS: &[&str] = &["km", "mi"];
// "apraisal" is a misspelling seen in older feeds.
pub const PRICE_TYPE: &[&str] = &[
    "quote", "offer", "msrp", "invoice", "call", "appraisal", "apraisal", "asking",
];
pub const PRICE_DELTA: &[&str] = &["absolute", "relative", "percentage"];
pub const PRICE_RELATIVE_TO: &[&str] = &["msrp", "invoice"];
pub const FINANCE_METHOD: &[&str] = &["cash", "finance", "lease"];
pub const AMOUNT_TYPE: &[&str] = &["downpayment", "monthly", "total"];
pub const AMOUNT_LIMIT: &[&str] = &["maximum", "minimum", "exact"];
pub const BALANCE_TYPE: &[&str] = &["finance", "residual"];
pub const NAME_PART: &[&str] = &["first", "middle", "suffix", "last", "full"];
pub const NAME_TYPE: &[&str] = &["individual", "business"];
pub const PHONE_TYPE: &[&str] = &["phone", "fax", "cellphone", "pager"];
pub const PHONE_TIME: &[&str] = &["morning", "afternoon", "evening", "nopreference", "day"];
pub const ADDRESS_TYPE: &[&str] = &["work", "home", "delivery"];
pub const STREET_LINE: &[&str] = &["1", "2", "3", "4", "5"];

/// Build the registry of all ADF record types
#[must_use]
pub fn registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new(SCHEMA_NAME, SCHEMA_VERSION, ROOT);
    for schema in [
        lead(),
        adf(),
        prospect(),
        id(),
        vehicle(),
        odometer(),
        color_combination(),
        image_tag(),
        price(),
        option(),
        finance(),
        amount(),
        balance(),
        customer(),
        contact(),
        name(),
        email(),
        phone(),
        address(),
        street(),
        time_frame(),
        vendor(),
        provider(),
    ] {
        registry.register(schema);
    }
    registry
}

fn lead() -> RecordSchema {
    RecordSchema::new("Lead").field(FieldSpec::record("adf", "ADF"))
}

fn adf() -> RecordSchema {
    RecordSchema::new("ADF").field(FieldSpec::record("prospect", "Prospect"))
}

fn prospect() -> RecordSchema {
    RecordSchema::new("Prospect")
        .field(
            FieldSpec::text("status")
                .alias("@status")
                .one_of("Prospect Status", PROSPECT_STATUS),
        )
        .field(FieldSpec::record("id", "Id"))
        .field(
            FieldSpec::text("request_date")
                .alias("requestdate")
                .date("Request Date"),
        )
        .field(FieldSpec::record("vehicle", "Vehicle").one_or_many())
        .field(FieldSpec::record("customer", "Customer"))
        .field(FieldSpec::record("vendor", "Vendor"))
        .field(FieldSpec::record("provider", "Provider"))
}

fn id() -> RecordSchema {
    RecordSchema::new("Id")
        .field(
            FieldSpec::integer("sequence")
                .alias("@sequence")
                .at_least("Sequence", 1),
        )
        .field(FieldSpec::text("source").alias("@source"))
        .field(FieldSpec::text("value").alias(TEXT_KEY))
}

fn vehicle() -> RecordSchema {
    RecordSchema::new("Vehicle")
        .field(
            FieldSpec::text("interest")
                .alias("@interest")
                .one_of("Interest", VEHICLE_INTEREST),
        )
        .field(
            FieldSpec::text("status")
                .alias("@status")
                .one_of("Status", VEHICLE_STATUS),
        )
        .field(FieldSpec::record("id", "Id"))
        .field(FieldSpec::text("year").required())
        .field(FieldSpec::text("make").required())
        .field(FieldSpec::text("model").required())
        .field(FieldSpec::text("vin"))
        .field(FieldSpec::text("stock"))
        .field(FieldSpec::text("trim"))
        .field(FieldSpec::text("doors"))
        .field(FieldSpec::text("bodystyle"))
        .field(FieldSpec::record("odometer", "Odometer"))
        .field(FieldSpec::text("condition").one_of("Condition", VEHICLE_CONDITION))
        .field(
            FieldSpec::record("color_combination", "ColorCombination")
                .alias("colorcombination")
                .one_or_many(),
        )
        .field(FieldSpec::record("imagetag", "ImageTag"))
        .field(FieldSpec::record("price", "Price"))
        .field(FieldSpec::text("price_comments").alias("pricecomments"))
        .field(FieldSpec::record("option", "Option"))
        .field(FieldSpec::record("finance", "Finance"))
        .field(FieldSpec::text("comments"))
}

fn odometer() -> RecordSchema {
    RecordSchema::new("Odometer")
        .field(
            FieldSpec::text("status")
                .alias("@status")
                .one_of("Status", ODOMETER_STATUS),
        )
        .field(
            FieldSpec::text("units")
                .alias("@units")
                .one_of("Units", ODOMETER_UNITS),
        )
        .field(FieldSpec::integer("odometer").alias(TEXT_KEY))
}

fn color_combination() -> RecordSchema {
    RecordSchema::new("ColorCombination")
        .field(FieldSpec::text("interior_color").alias("interiorcolor"))
        .field(FieldSpec::text("exterior_color").alias("exteriorcolor"))
        .field(FieldSpec::integer("preference").at_least("Preference", 1))
}

fn image_tag() -> RecordSchema {
    RecordSchema::new("ImageTag")
        .field(FieldSpec::text("width").alias("@width"))
        .field(FieldSpec::text("height").alias("@height"))
        .field(FieldSpec::text("alt_text").alias("@alttext"))
        .field(FieldSpec::text("image_tag").alias(TEXT_KEY))
}

fn price() -> RecordSchema {
    RecordSchema::new("Price")
        .field(
            FieldSpec::text("type")
                .alias("@type")
                .one_of("Price Type", PRICE_TYPE),
        )
        .field(
            FieldSpec::text("currency")
                .alias("@currency")
                .alias("@curreny")
                .currency(),
        )
        .field(
            FieldSpec::text("delta")
                .alias("@delta")
                .one_of("Price Delta", PRICE_DELTA),
        )
        .field(
            FieldSpec::text("relative_to")
                .alias("@relativeto")
                .alias("@relative_to")
                .one_of("Price Relative To", PRICE_RELATIVE_TO),
        )
        .field(FieldSpec::text("source").alias("@source"))
        .field(FieldSpec::integer("price").alias(TEXT_KEY).alias("@price"))
}

fn option() -> RecordSchema {
    RecordSchema::new("Option")
        .field(FieldSpec::text("option_name").alias("optionname"))
        .field(FieldSpec::text("manufacture_code").alias("manufacturercode"))
        .field(FieldSpec::text("stock"))
        .field(FieldSpec::integer("weighting").between_exclusive("Weighting", -100, 100))
        .field(FieldSpec::record("price", "Price"))
}

fn finance() -> RecordSchema {
    RecordSchema::new("Finance")
        .field(FieldSpec::text("method").one_of("Finance Method", FINANCE_METHOD))
        .field(FieldSpec::record("amount", "Amount"))
        .field(FieldSpec::record("balance", "Balance"))
}

fn amount() -> RecordSchema {
    RecordSchema::new("Amount")
        .field(
            FieldSpec::text("type")
                .alias("@type")
                .one_of("Amount Type", AMOUNT_TYPE),
        )
        .field(
            FieldSpec::text("limit")
                .alias("@limit")
                .one_of("Amount Limit", AMOUNT_LIMIT),
        )
        .field(FieldSpec::text("currency").alias("@currency").currency())
        .field(FieldSpec::integer("amount").alias(TEXT_KEY))
}

fn balance() -> RecordSchema {
    RecordSchema::new("Balance")
        .field(
            FieldSpec::text("type")
                .alias("@type")
                .one_of("Balance Type", BALANCE_TYPE),
        )
        .field(FieldSpec::text("currency").alias("@currency").currency())
        .field(FieldSpec::integer("balance").alias(TEXT_KEY))
}

fn customer() -> RecordSchema {
    RecordSchema::new("Customer")
        .field(FieldSpec::record("contact", "Contact"))
        .field(FieldSpec::record("id", "Id"))
        .field(FieldSpec::record("timeframe", "TimeFrame"))
        .field(FieldSpec::text("comments"))
}

fn contact() -> RecordSchema {
    RecordSchema::new("Contact")
        .field(FieldSpec::integer("primary_contact").alias("@primarycontact"))
        .field(FieldSpec::record("name", "Name").one_or_many().required())
        .field(FieldSpec::record("email", "Email"))
        .field(FieldSpec::record("phone", "Phone").one_or_many())
        .field(FieldSpec::record("address", "Address"))
}

fn name() -> RecordSchema {
    RecordSchema::new("Name")
        .field(
            FieldSpec::text("part")
                .alias("@part")
                .one_of("Name Part", NAME_PART),
        )
        .field(
            FieldSpec::text("type")
                .alias("@type")
                .one_of("Name Type", NAME_TYPE),
        )
        .field(FieldSpec::text("name").alias(TEXT_KEY))
}

fn email() -> RecordSchema {
    RecordSchema::new("Email")
        .field(FieldSpec::integer("preferred_contact").alias("@preferredcontact"))
        .field(FieldSpec::text("email").alias(TEXT_KEY))
}

fn phone() -> RecordSchema {
    RecordSchema::new("Phone")
        .field(
            FieldSpec::text("type")
                .alias("@type")
                .one_of("Phone Type", PHONE_TYPE),
        )
        .field(
            FieldSpec::text("time")
                .alias("@time")
                .one_of("Phone Time", PHONE_TIME),
        )
        .field(FieldSpec::integer("preferred_contact").alias("@preferredcontact"))
        .field(FieldSpec::text("phone").alias(TEXT_KEY))
}

fn address() -> RecordSchema {
    RecordSchema::new("Address")
        .field(
            FieldSpec::text("type")
                .alias("@type")
                .one_of("Address Type", ADDRESS_TYPE),
        )
        .field(FieldSpec::record("street", "Street").one_or_many())
        .field(FieldSpec::text("apartment"))
        .field(FieldSpec::text("city"))
        .field(FieldSpec::text("regioncode"))
        .field(FieldSpec::text("postalcode"))
        .field(FieldSpec::text("country").country())
}

fn street() -> RecordSchema {
    RecordSchema::new("Street")
        .field(
            FieldSpec::text("line")
                .alias("@line")
                .one_of("Street Line", STREET_LINE),
        )
        .field(FieldSpec::text("street").alias(TEXT_KEY))
}

fn time_frame() -> RecordSchema {
    RecordSchema::new("TimeFrame")
        .field(FieldSpec::text("description"))
        .field(
            FieldSpec::text("earliest_date")
                .alias("earliestdate")
                .date("Earliest Date"),
        )
        .field(
            FieldSpec::text("latest_date")
                .alias("latestdate")
                .date("Latest Date"),
        )
        .rule(RecordRule::AnyOf {
            fields: &["earliest_date", "latest_date"],
            message: "At least one of 'earliest_date' or 'latest_date' must be provided.",
        })
}

fn vendor() -> RecordSchema {
    RecordSchema::new("Vendor")
        .field(FieldSpec::record("id", "Id"))
        .field(FieldSpec::text("vendorname").required())
        .field(FieldSpec::text("url"))
        .field(FieldSpec::record("contact", "Contact"))
}

fn provider() -> RecordSchema {
    RecordSchema::new("Provider")
        .field(FieldSpec::record("id", "Id"))
        .field(FieldSpec::record("name", "Name").required())
        .field(FieldSpec::text("service"))
        .field(FieldSpec::text("url"))
        .field(FieldSpec::record("email", "Email"))
        .field(FieldSpec::record("phone", "Phone").one_or_many())
        .field(FieldSpec::record("contact", "Contact"))
}
