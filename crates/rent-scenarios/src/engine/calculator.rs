use super::domain::{ConcessionType, EngineError, Floorplan, FloorplanFigures, ScenarioAdjustments};

/// Computes adjusted rents, gross rent, concession amount, and net effective
/// rent for one floorplan under one scenario's adjustments.
///
/// Numeric edge cases are accepted and returned as computed rather than
/// clamped: negative adjustment fractions may drive adjusted rents negative,
/// a percentage concession above 100 or a free-months value above 12 yields
/// a negative net effective rent. Only the dollar concession floors the net
/// at zero. Clamping elsewhere would hide analyst input mistakes that should
/// surface as visibly unusual output.
pub fn calculate_floorplan_figures(
    floorplan: &Floorplan,
    adjustments: &ScenarioAdjustments,
) -> Result<FloorplanFigures, EngineError> {
    floorplan.validate()?;
    adjustments.validate()?;

    let adjusted_base = apply_adjustment(
        floorplan.base_rent,
        adjustments.base_rent_pct_adj,
        adjustments.base_rent_dollar_adj,
    );
    let adjusted_amenity = apply_adjustment(
        floorplan.amenity_rent,
        adjustments.amenity_rent_pct_adj,
        adjustments.amenity_rent_dollar_adj,
    );
    let gross_rent = adjusted_base + adjusted_amenity;

    let (concession_amount, net_effective_rent) = apply_concession(
        gross_rent,
        adjustments.concession_type,
        adjustments.concession_value,
    );

    Ok(FloorplanFigures {
        adjusted_base,
        adjusted_amenity,
        gross_rent,
        concession_amount,
        net_effective_rent,
    })
}

/// Multiplicative first, additive second: `base * (1 + pct) + dollar`.
fn apply_adjustment(base: f64, pct_adj: f64, dollar_adj: f64) -> f64 {
    base * (1.0 + pct_adj) + dollar_adj
}

fn apply_concession(gross_rent: f64, concession: ConcessionType, value: f64) -> (f64, f64) {
    match concession {
        ConcessionType::None => (0.0, gross_rent),
        ConcessionType::Percentage => {
            let amount = gross_rent * (value / 100.0);
            (amount, gross_rent - amount)
        }
        ConcessionType::Dollar => (value, (gross_rent - value).max(0.0)),
        ConcessionType::FreeMonths => {
            // N free months amortized over a 12-month lease.
            let amount = gross_rent * (value / 12.0);
            (amount, gross_rent * ((12.0 - value) / 12.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_bedroom() -> Floorplan {
        Floorplan {
            name: "B1 - One Bedroom".to_string(),
            unit_type: "1BR".to_string(),
            unit_count: 10,
            square_footage: 750.0,
            base_rent: 1000.0,
            amenity_rent: 100.0,
        }
    }

    fn no_adjustments() -> ScenarioAdjustments {
        ScenarioAdjustments::default()
    }

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn zero_adjustments_and_no_concession_pass_rent_through() {
        let figures =
            calculate_floorplan_figures(&one_bedroom(), &no_adjustments()).expect("figures");

        assert!(close(figures.adjusted_base, 1000.0));
        assert!(close(figures.adjusted_amenity, 100.0));
        assert!(close(figures.gross_rent, 1100.0));
        assert!(close(figures.concession_amount, 0.0));
        assert!(close(figures.net_effective_rent, 1100.0));
    }

    #[test]
    fn dollar_adjustment_adds_on_top_of_percentage() {
        let adjustments = ScenarioAdjustments {
            base_rent_pct_adj: 0.10,
            base_rent_dollar_adj: -25.0,
            ..no_adjustments()
        };

        let figures = calculate_floorplan_figures(&one_bedroom(), &adjustments).expect("figures");

        // 1000 * 1.10 - 25, never (1000 - 25) * 1.10.
        assert!(close(figures.adjusted_base, 1075.0));
    }

    #[test]
    fn five_percent_base_bump_with_dollar_concession_matches_reference_figures() {
        let adjustments = ScenarioAdjustments {
            base_rent_pct_adj: 0.05,
            concession_type: ConcessionType::Dollar,
            concession_value: 50.0,
            ..no_adjustments()
        };

        let figures = calculate_floorplan_figures(&one_bedroom(), &adjustments).expect("figures");

        assert!(close(figures.adjusted_base, 1050.0));
        assert!(close(figures.gross_rent, 1150.0));
        assert!(close(figures.concession_amount, 50.0));
        assert!(close(figures.net_effective_rent, 1100.0));
    }

    #[test]
    fn percentage_concession_takes_percent_points_off_gross() {
        let adjustments = ScenarioAdjustments {
            concession_type: ConcessionType::Percentage,
            concession_value: 10.0,
            ..no_adjustments()
        };

        let figures = calculate_floorplan_figures(&one_bedroom(), &adjustments).expect("figures");

        assert!(close(figures.concession_amount, 110.0));
        assert!(close(figures.net_effective_rent, 990.0));
    }

    #[test]
    fn percentage_concession_above_one_hundred_goes_negative_unclamped() {
        let adjustments = ScenarioAdjustments {
            concession_type: ConcessionType::Percentage,
            concession_value: 150.0,
            ..no_adjustments()
        };

        let figures = calculate_floorplan_figures(&one_bedroom(), &adjustments).expect("figures");

        assert!(close(figures.net_effective_rent, -550.0));
    }

    #[test]
    fn dollar_concession_floors_net_effective_at_zero() {
        let adjustments = ScenarioAdjustments {
            concession_type: ConcessionType::Dollar,
            concession_value: 5000.0,
            ..no_adjustments()
        };

        let figures = calculate_floorplan_figures(&one_bedroom(), &adjustments).expect("figures");

        assert!(close(figures.concession_amount, 5000.0));
        assert!(close(figures.net_effective_rent, 0.0));
    }

    #[test]
    fn zero_free_months_is_equivalent_to_no_concession() {
        let adjustments = ScenarioAdjustments {
            concession_type: ConcessionType::FreeMonths,
            concession_value: 0.0,
            ..no_adjustments()
        };

        let with_free_months =
            calculate_floorplan_figures(&one_bedroom(), &adjustments).expect("figures");
        let without =
            calculate_floorplan_figures(&one_bedroom(), &no_adjustments()).expect("figures");

        assert!(close(
            with_free_months.net_effective_rent,
            without.net_effective_rent
        ));
    }

    #[test]
    fn one_free_month_amortizes_to_eleven_twelfths_of_gross() {
        let adjustments = ScenarioAdjustments {
            concession_type: ConcessionType::FreeMonths,
            concession_value: 1.0,
            ..no_adjustments()
        };

        let figures = calculate_floorplan_figures(&one_bedroom(), &adjustments).expect("figures");

        assert!(close(figures.gross_rent, 1100.0));
        assert!(close(figures.net_effective_rent, 1100.0 * 11.0 / 12.0));
    }

    #[test]
    fn twelve_free_months_zero_out_net_effective_rent() {
        let adjustments = ScenarioAdjustments {
            concession_type: ConcessionType::FreeMonths,
            concession_value: 12.0,
            ..no_adjustments()
        };

        let figures = calculate_floorplan_figures(&one_bedroom(), &adjustments).expect("figures");

        assert!(close(figures.net_effective_rent, 0.0));
    }

    #[test]
    fn free_months_beyond_lease_term_go_negative_unclamped() {
        let adjustments = ScenarioAdjustments {
            concession_type: ConcessionType::FreeMonths,
            concession_value: 13.0,
            ..no_adjustments()
        };

        let figures = calculate_floorplan_figures(&one_bedroom(), &adjustments).expect("figures");

        assert!(figures.net_effective_rent < 0.0);
        assert!(close(figures.net_effective_rent, 1100.0 * -1.0 / 12.0));
    }

    #[test]
    fn negative_percentage_adjustment_may_drive_rent_negative() {
        let adjustments = ScenarioAdjustments {
            base_rent_pct_adj: -1.5,
            ..no_adjustments()
        };

        let figures = calculate_floorplan_figures(&one_bedroom(), &adjustments).expect("figures");

        assert!(close(figures.adjusted_base, -500.0));
        assert!(close(figures.net_effective_rent, -400.0));
    }

    #[test]
    fn rejects_non_positive_square_footage() {
        let mut floorplan = one_bedroom();
        floorplan.square_footage = 0.0;

        let result = calculate_floorplan_figures(&floorplan, &no_adjustments());
        match result {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "square_footage"),
            other => panic!("expected invalid input error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_rents() {
        let mut floorplan = one_bedroom();
        floorplan.base_rent = -1.0;
        assert!(matches!(
            calculate_floorplan_figures(&floorplan, &no_adjustments()),
            Err(EngineError::InvalidInput {
                field: "base_rent",
                ..
            })
        ));

        let mut floorplan = one_bedroom();
        floorplan.amenity_rent = -0.01;
        assert!(matches!(
            calculate_floorplan_figures(&floorplan, &no_adjustments()),
            Err(EngineError::InvalidInput {
                field: "amenity_rent",
                ..
            })
        ));
    }

    #[test]
    fn rejects_negative_concession_value() {
        let adjustments = ScenarioAdjustments {
            concession_type: ConcessionType::Dollar,
            concession_value: -50.0,
            ..no_adjustments()
        };

        assert!(matches!(
            calculate_floorplan_figures(&one_bedroom(), &adjustments),
            Err(EngineError::InvalidInput {
                field: "concession_value",
                ..
            })
        ));
    }
}
