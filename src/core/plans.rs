// Static subscription catalog

use crate::core::models::SubscriptionPlan;

const PREMIUM_FEATURES: [&str; 6] = [
    "Real-time Protection",
    "Secure VPN",
    "App Lock",
    "Scheduled Scans",
    "Ad-free Experience",
    "Priority Support",
];

/// All purchasable plan tiers, cheapest first
pub fn plan_catalog() -> Vec<SubscriptionPlan> {
    let mut yearly_features = PREMIUM_FEATURES.to_vec();
    yearly_features.push("Save 30%");

    vec![
        SubscriptionPlan {
            id: "monthly",
            name: "Premium Monthly",
            price: 299,
            currency: "INR",
            interval: "month",
            features: PREMIUM_FEATURES.to_vec(),
            discount: None,
        },
        SubscriptionPlan {
            id: "yearly",
            name: "Premium Yearly",
            price: 2499,
            currency: "INR",
            interval: "year",
            features: yearly_features,
            discount: Some(30),
        },
    ]
}
