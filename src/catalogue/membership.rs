//! The Coastal Grand Hotel membership application

use super::{Catalogue, CatalogueError, FieldDescriptor, FieldKind, InputSubtype, Step};

const SALUTATIONS: &[(&str, &str)] = &[
    ("Mr.", "Mr."),
    ("Mrs.", "Mrs."),
    ("Ms.", "Ms."),
    ("Dr.", "Dr."),
];

const GENDERS: &[(&str, &str)] = &[("Male", "male"), ("Female", "female"), ("Other", "other")];

const CARD_TYPES: &[(&str, &str)] = &[
    ("Visa", "visa"),
    ("Mastercard", "mastercard"),
    ("American Express", "amex"),
    ("RuPay", "rupay"),
];

const KYC_DOCUMENTS: &[(&str, &str)] = &[
    ("Aadhar Card", "aadhar"),
    ("PAN Card", "pan"),
    ("Passport", "passport"),
    ("Driving License", "driving_license"),
    ("Voter ID", "voter_id"),
];

fn text(name: &str, label: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::Text)
}

fn number(name: &str, label: &str) -> FieldDescriptor {
    text(name, label).subtype(InputSubtype::Number)
}

fn date(name: &str, label: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::Date)
}

fn select(name: &str, label: &str, options: &[(&str, &str)]) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::Select).options(options)
}

fn radio(name: &str, label: &str, options: &[(&str, &str)]) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::Radio).options(options)
}

fn checkboxes(name: &str, label: &str, options: &[(&str, &str)]) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::Checkbox).options(options)
}

fn member_details() -> (Vec<FieldDescriptor>, Step) {
    let fields = vec![
        select(
            "memberType",
            "Member Type",
            &[
                ("Individual", "individual"),
                ("Primary", "primary"),
                ("Corporate", "corporate"),
            ],
        )
        .required(),
        select("salutation", "Salutation", SALUTATIONS).required(),
        text("firstName", "First Name").required().placeholder("John"),
        text("middleName", "Middle Name"),
        text("lastName", "Last Name").required().placeholder("Doe"),
        date("dateOfBirth", "Date of Birth")
            .required()
            .describe("Required for age verification."),
        select(
            "ageRange",
            "Age Range",
            &[
                ("18-25", "18-25"),
                ("25-35", "25-35"),
                ("35-45", "35-45"),
                ("45-55", "45-55"),
                ("55+", "55+"),
            ],
        )
        .required(),
        radio(
            "occupation",
            "Occupation",
            &[
                ("Salaried", "salaried"),
                ("Business", "business"),
                ("Professional", "professional"),
                ("Retired", "retired"),
            ],
        )
        .required(),
        text("profession", "Profession").required(),
        text("firmName", "Firm Name"),
        text("designation", "Designation"),
        select(
            "annualIncome",
            "Annual Income (INR)",
            &[
                ("Up to 2,50,000", "0-250000"),
                ("2,50,000 - 5,00,000", "250000-500000"),
                ("5,00,000 - 10,00,000", "500000-1000000"),
                ("Above 10,00,000", "1000000+"),
            ],
        )
        .required(),
        radio(
            "foodPreference",
            "Food Preference",
            &[("Vegetarian", "veg"), ("Non-Vegetarian", "non-veg"), ("Vegan", "vegan")],
        )
        .required(),
        FieldDescriptor::new("cuisinePreference", "Cuisine Preference", FieldKind::Multiselect)
            .options(&[
                ("Indian", "indian"),
                ("Continental", "continental"),
                ("Chinese", "chinese"),
                ("Mexican", "mexican"),
                ("Italian", "italian"),
            ])
            .describe("Helps us tailor your dining experience."),
        text("holidayDestination", "Favourite Holiday Destination"),
        text("facebookId", "Facebook ID"),
        text("twitterId", "Twitter ID"),
        radio("hasOwnCar", "Do you own a car?", &[("Yes", "yes"), ("No", "no")]),
    ];
    let step = Step::new(
        "Personal Information",
        "Basic member details and preferences",
        &[
            "memberType",
            "salutation",
            "firstName",
            "middleName",
            "lastName",
            "dateOfBirth",
            "ageRange",
            "occupation",
            "profession",
            "firmName",
            "designation",
            "annualIncome",
            "foodPreference",
            "cuisinePreference",
            "holidayDestination",
            "facebookId",
            "twitterId",
            "hasOwnCar",
        ],
    );
    (fields, step)
}

fn co_applicant() -> (Vec<FieldDescriptor>, Step) {
    let fields = vec![
        select("coApplicantSalutation", "Co-Applicant Salutation", SALUTATIONS),
        text("coApplicantFirstName", "Co-Applicant First Name"),
        text("coApplicantMiddleName", "Co-Applicant Middle Name"),
        text("coApplicantLastName", "Co-Applicant Last Name"),
        select(
            "coApplicantRelationship",
            "Relationship",
            &[
                ("Spouse", "spouse"),
                ("Parent", "parent"),
                ("Sibling", "sibling"),
                ("Child", "child"),
                ("Other", "other"),
            ],
        ),
        date("coApplicantDateOfBirth", "Co-Applicant Date of Birth"),
        text("coApplicantStdCode", "STD Code"),
        text("coApplicantPhone", "Phone"),
        text("coApplicantFax", "Fax"),
        text("coApplicantMobile", "Mobile"),
        text("coApplicantEmail", "Email"),
    ];
    let step = Step::new(
        "Co-Applicant Details",
        "Co-applicant information (if applicable)",
        &[
            "coApplicantSalutation",
            "coApplicantFirstName",
            "coApplicantMiddleName",
            "coApplicantLastName",
            "coApplicantRelationship",
            "coApplicantDateOfBirth",
            "coApplicantStdCode",
            "coApplicantPhone",
            "coApplicantFax",
            "coApplicantMobile",
            "coApplicantEmail",
        ],
    );
    (fields, step)
}

fn family_and_contact() -> (Vec<FieldDescriptor>, Step) {
    let mut fields = vec![
        select("spouseSalutation", "Spouse Salutation", SALUTATIONS),
        text("spouseName", "Spouse Name"),
        date("spouseDateOfBirth", "Spouse Date of Birth"),
        date("weddingAnniversary", "Wedding Anniversary"),
        select(
            "numberOfChildren",
            "Number of Children",
            &[("0", "0"), ("1", "1"), ("2", "2"), ("3", "3")],
        ),
    ];
    for child in 1..=3 {
        fields.push(text(&format!("child{child}Name"), &format!("Child {child} Name")));
        fields.push(radio(
            &format!("child{child}Gender"),
            &format!("Child {child} Gender"),
            GENDERS,
        ));
        fields.push(date(
            &format!("child{child}DateOfBirth"),
            &format!("Child {child} Date of Birth"),
        ));
    }
    fields.extend([
        text("spouseMobile", "Spouse Mobile"),
        text("spouseEmail", "Spouse Email"),
        text("premisesName", "Premises Name").required(),
        text("roadStreetLane", "Road/Street/Lane").required(),
        text("areaLocality", "Area/Locality").required(),
        text("landmark", "Landmark"),
        text("city", "City").required(),
        text("state", "State").required(),
        text("country", "Country").required().placeholder("India"),
        text("postalCode", "Postal Code").required(),
        text("contactStdCode", "STD Code"),
        text("contactPhone", "Phone"),
        text("contactFax", "Fax"),
        text("contactMobile", "Mobile Number").required(),
        text("contactEmail", "Email Address")
            .required()
            .subtype(InputSubtype::Email)
            .placeholder("john.doe@example.com")
            .describe("We'll send your membership details to this email."),
    ]);
    let names: Vec<String> = fields.iter().map(|f| f.name.clone()).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let step = Step::new(
        "Family & Contact Details",
        "Spouse, family and address information",
        &name_refs,
    );
    (fields, step)
}

fn communication() -> (Vec<FieldDescriptor>, Step) {
    let fields = vec![
        checkboxes(
            "preferredContactMethod",
            "Preferred Contact Method",
            &[("Email", "email"), ("SMS", "sms"), ("Phone", "phone")],
        )
        .required(),
        radio(
            "mailingAddress",
            "Mailing Address",
            &[("Home", "home"), ("Office", "office")],
        )
        .required(),
        checkboxes(
            "communicationMode",
            "Communication Mode",
            &[("Email", "email"), ("SMS", "sms"), ("Post", "post")],
        )
        .required(),
    ];
    let step = Step::new(
        "Communication Preferences",
        "How you prefer to be contacted",
        &["preferredContactMethod", "mailingAddress", "communicationMode"],
    );
    (fields, step)
}

fn product() -> (Vec<FieldDescriptor>, Step) {
    let fields = vec![
        select(
            "membershipCategory",
            "Membership Category",
            &[
                ("Bronze", "bronze"),
                ("Silver", "silver"),
                ("Gold", "gold"),
                ("Platinum", "platinum"),
                ("Diamond", "diamond"),
            ],
        )
        .required()
        .describe("Choose your desired membership level."),
        select(
            "membershipYears",
            "Number of Years",
            &[
                ("1 Year", "1"),
                ("3 Years", "3"),
                ("5 Years", "5"),
                ("7 Years", "7"),
                ("10 Years", "10"),
            ],
        )
        .required(),
    ];
    let step = Step::new(
        "Membership & Product Details",
        "Choose your membership category and duration",
        &["membershipCategory", "membershipYears"],
    );
    (fields, step)
}

fn payment() -> (Vec<FieldDescriptor>, Step) {
    let fields = vec![
        number("membershipPrice", "Membership Price (INR)").required(),
        number("downPaymentAmount", "Down Payment Amount (INR)").required(),
        select(
            "downPaymentOption",
            "Down Payment Option",
            &[("10%", "10%"), ("20%", "20%"), ("25%", "25%"), ("50%", "50%")],
        )
        .required(),
        radio(
            "paymentMode",
            "Payment Mode",
            &[
                ("Cash", "cash"),
                ("Demand Draft", "dd"),
                ("Credit Card", "credit_card"),
            ],
        )
        .required(),
        date("cashPaymentDate", "Cash Payment Date"),
        number("cashPaymentAmount", "Cash Payment Amount"),
        text("cashReceiptNo", "Cash Receipt No."),
        text("ddBankName", "DD Bank Name"),
        text("ddInsuranceNo", "DD Instrument No."),
        date("ddDate", "DD Date"),
        text("creditCardNo", "Credit Card No."),
        date("creditCardExpiry", "Credit Card Expiry"),
        text("creditCardAuthNo", "Authorization No."),
        checkboxes("creditCardType", "Card Type", CARD_TYPES),
        checkboxes(
            "creditCardCategory",
            "Card Category",
            &[
                ("Classic", "classic"),
                ("Gold", "gold"),
                ("Platinum", "platinum"),
                ("Corporate", "corporate"),
            ],
        ),
        text("issuingBankName", "Issuing Bank Name"),
    ];
    let step = Step::new(
        "Payment Information",
        "Payment details and options",
        &[
            "membershipPrice",
            "downPaymentAmount",
            "downPaymentOption",
            "paymentMode",
            "cashPaymentDate",
            "cashPaymentAmount",
            "cashReceiptNo",
            "ddBankName",
            "ddInsuranceNo",
            "ddDate",
            "creditCardNo",
            "creditCardExpiry",
            "creditCardAuthNo",
            "creditCardType",
            "creditCardCategory",
            "issuingBankName",
        ],
    );
    (fields, step)
}

fn emi_plan() -> (Vec<FieldDescriptor>, Step) {
    let fields = vec![
        select(
            "emiOptedPercentage",
            "EMI Opted (%)",
            &[("25%", "25"), ("50%", "50"), ("75%", "75")],
        ),
        radio(
            "emiPaymentMode",
            "EMI Payment Mode",
            &[
                ("ECS", "ecs"),
                ("Post-dated Cheques", "pdc"),
                ("Credit Card", "credit_card"),
            ],
        ),
        FieldDescriptor::new(
            "emiThirdPartyPayment",
            "EMI paid by a third party",
            FieldKind::Checkbox,
        ),
        text("emiBankName", "EMI Bank Name"),
        text("emiInstrumentNo", "EMI Instrument No."),
        date("emiDate", "EMI Date"),
        text("emiCreditCardNo", "EMI Credit Card No."),
        date("emiCreditCardExpiry", "EMI Credit Card Expiry"),
        text("emiCreditCardAuthNo", "EMI Authorization No."),
        checkboxes("emiCreditCardType", "EMI Card Type", CARD_TYPES),
        text("ecsBank", "ECS Bank"),
        date("ecsDate", "ECS Date"),
        text("ecsMicrNo", "ECS MICR No."),
        text("ecsSampleInstrumentNo", "ECS Sample Instrument No."),
    ];
    let step = Step::new(
        "EMI Plan",
        "EMI options and payment setup (if applicable)",
        &[
            "emiOptedPercentage",
            "emiPaymentMode",
            "emiThirdPartyPayment",
            "emiBankName",
            "emiInstrumentNo",
            "emiDate",
            "emiCreditCardNo",
            "emiCreditCardExpiry",
            "emiCreditCardAuthNo",
            "emiCreditCardType",
            "ecsBank",
            "ecsDate",
            "ecsMicrNo",
            "ecsSampleInstrumentNo",
        ],
    );
    (fields, step)
}

fn kyc() -> (Vec<FieldDescriptor>, Step) {
    let fields = vec![
        checkboxes("kycDocumentType", "KYC Documents", KYC_DOCUMENTS).required(),
        checkboxes(
            "coApplicantKycDocumentType",
            "Co-Applicant KYC Documents",
            KYC_DOCUMENTS,
        ),
        text("executiveName", "Executive Name"),
        text("executiveCmeId", "Executive CME ID"),
        date("executiveDate", "Executive Date"),
    ];
    let step = Step::new(
        "KYC Documents",
        "Document verification and executive details",
        &[
            "kycDocumentType",
            "coApplicantKycDocumentType",
            "executiveName",
            "executiveCmeId",
            "executiveDate",
        ],
    );
    (fields, step)
}

fn signatures() -> (Vec<FieldDescriptor>, Step) {
    let fields = vec![
        FieldDescriptor::new("memberSignature", "Member Signature", FieldKind::Signature)
            .required()
            .describe("Type your full name to sign."),
        FieldDescriptor::new(
            "coApplicantSignature",
            "Co-Applicant Signature",
            FieldKind::Signature,
        ),
    ];
    let step = Step::new(
        "Signatures & Declaration",
        "Digital signatures and final confirmation",
        &["memberSignature", "coApplicantSignature"],
    );
    (fields, step)
}

/// Build and check the full membership catalogue.
pub fn membership_catalogue() -> Result<Catalogue, CatalogueError> {
    let sections = [
        member_details(),
        co_applicant(),
        family_and_contact(),
        communication(),
        product(),
        payment(),
        emi_plan(),
        kyc(),
        signatures(),
    ];

    let mut fields = Vec::new();
    let mut steps = Vec::new();
    for (section_fields, step) in sections {
        fields.extend(section_fields);
        steps.push(step);
    }

    Catalogue::new(fields, steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_catalogue_passes_startup_checks() {
        let catalogue = membership_catalogue().unwrap();
        assert_eq!(catalogue.step_count(), 9);
        assert_eq!(catalogue.steps()[0].title, "Personal Information");
        assert_eq!(catalogue.steps()[8].title, "Signatures & Declaration");
    }

    #[test]
    fn test_contact_email_is_required_email() {
        let catalogue = membership_catalogue().unwrap();
        let email = catalogue.field("contactEmail").unwrap();
        assert!(email.required);
        assert_eq!(email.subtype_or_default(), InputSubtype::Email);
        assert_eq!(catalogue.step_of("contactEmail"), Some(2));
    }

    #[test]
    fn test_children_fields_are_generated() {
        let catalogue = membership_catalogue().unwrap();
        for child in 1..=3 {
            assert!(catalogue.field(&format!("child{child}Name")).is_some());
            assert_eq!(
                catalogue.field(&format!("child{child}DateOfBirth")).unwrap().kind,
                FieldKind::Date
            );
        }
    }

    #[test]
    fn test_emi_step_has_no_required_fields() {
        let catalogue = membership_catalogue().unwrap();
        assert!(catalogue.step_fields(6).iter().all(|f| !f.required));
    }
}
