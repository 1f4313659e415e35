//! The two premium plans. Prices are whole KES; Paystack gets the
//! subunit amount at call time.

#[derive(Debug, Clone, Copy)]
pub struct Plan {
    pub code: &'static str,
    pub amount_kes: i64,
    pub duration_days: i64,
}

pub const PLANS: &[Plan] = &[
    Plan {
        code: "premium_monthly",
        amount_kes: 1_500,
        duration_days: 30,
    },
    Plan {
        code: "premium_annual",
        amount_kes: 15_000,
        duration_days: 365,
    },
];

pub fn find_plan(code: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_plan_pricing() {
        let plan = find_plan("premium_monthly").unwrap();
        assert_eq!(plan.amount_kes, 1_500);
        assert_eq!(plan.duration_days, 30);
    }

    #[test]
    fn test_annual_plan_pricing() {
        let plan = find_plan("premium_annual").unwrap();
        assert_eq!(plan.amount_kes, 15_000);
        assert_eq!(plan.duration_days, 365);
    }

    #[test]
    fn test_unknown_plan_code() {
        assert!(find_plan("premium_weekly").is_none());
    }
}
