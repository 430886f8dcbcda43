//! Membership terms and conditions, broken into display lines

/// Terms text, one display line per entry
pub const TERMS_LINES: &[&str] = &[
    "Welcome to the Coastal Grand Hotel Membership Program! By becoming",
    "a member, you agree to the following terms and conditions. Please",
    "read them carefully.",
    "",
    "1.  Membership Eligibility: Membership is open to individuals aged",
    "    18 years or older. The Coastal Grand Hotel reserves the right to",
    "    refuse or revoke membership at its sole discretion.",
    "",
    "2.  Membership Benefits: Membership benefits are subject to change",
    "    without prior notice. Benefits may include discounted room rates,",
    "    exclusive access to hotel facilities, special offers and loyalty",
    "    points. Specific benefits depend on your membership tier.",
    "",
    "3.  Membership Tiers:",
    "    - Bronze: basic discounts, newsletter access.",
    "    - Silver: enhanced discounts, early check-in and late check-out",
    "      (subject to availability).",
    "    - Gold: premium discounts, complimentary breakfast, room upgrades",
    "      (subject to availability).",
    "    - Platinum: VIP treatment, dedicated concierge, executive lounge",
    "      access, complimentary airport transfers.",
    "",
    "4.  Data Privacy: All personal information collected will be used in",
    "    accordance with our Privacy Policy. By signing up, you consent to",
    "    the collection and use of your data as described therein.",
    "",
    "5.  Membership Fees: Some membership tiers may require an annual fee.",
    "    Fees are non-refundable unless otherwise stated.",
    "",
    "6.  Cancellation: You may cancel your membership at any time by",
    "    contacting our membership services. No refunds will be issued for",
    "    partial membership periods.",
    "",
    "7.  Changes to Terms: The hotel may modify these terms at any time.",
    "    Members will be notified of significant changes by email or on our",
    "    website. Continued use of the membership after changes constitutes",
    "    acceptance of the new terms.",
    "",
    "8.  Limitation of Liability: The hotel shall not be liable for any",
    "    loss, damage or injury arising from your participation in the",
    "    membership program, except where prohibited by law.",
    "",
    "9.  Governing Law: These terms are governed by the laws of the",
    "    jurisdiction where the hotel is located.",
    "",
    "10. Contact: For any questions regarding your membership or these",
    "    terms, please contact our membership services department.",
    "",
    "By accepting below, you acknowledge that you have read, understood",
    "and agree to be bound by these Terms and Conditions.",
];

/// Widest line, in characters
pub fn terms_width() -> usize {
    TERMS_LINES
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
}
