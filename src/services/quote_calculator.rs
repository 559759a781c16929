/// ============================================================
///  PV Quote Estimator
///
///  Pipeline:
///   1. Energy per panel   – irradiance × rated power × η_inv × η_sys,
///                           scaled to a 30-day month
///   2. Sizing             – smallest whole panel count covering the
///                           monthly consumption
///   3. Generation         – monthly / yearly output of the sized array
///   4. Cost               – panels, inverter, installation, balance of
///                           system + battery, topology multiplier
///   5. Savings & payback  – flat electricity rate
///   6. Environment        – grid CO2 factor
/// ============================================================

use crate::error::{FieldErrors, QuoteError};
use crate::models::quote::{
    CostBreakdown, Environmental, PanelTechnology, QuoteForm, QuoteRequest, QuoteResult, Savings,
    SystemTopology, TechnicalDetails,
};

// ─── Fixed parameters ────────────────────────────────────────
pub const INVERTER_EFFICIENCY: f64 = 0.95;
pub const SYSTEM_EFFICIENCY: f64 = 0.90;
pub const DAYS_PER_MONTH: f64 = 30.0;
/// USD per kWh
pub const ELECTRICITY_RATE: f64 = 0.12;
/// kg CO2 per kWh
pub const CO2_FACTOR: f64 = 0.5;
/// USD per kW of inverter capacity
pub const INVERTER_COST_PER_KW: f64 = 200.0;
/// Share of panel cost
pub const INSTALLATION_SHARE: f64 = 0.3;
/// Share of panel cost, before battery
pub const BALANCE_OF_SYSTEM_SHARE: f64 = 0.2;

/// Check the raw form and turn it into a [`QuoteRequest`].
///
/// Every field is checked so the caller gets the full set of per-field
/// messages in one pass.
pub fn validate(form: &QuoteForm) -> Result<QuoteRequest, QuoteError> {
    let mut errors = FieldErrors::new();

    let consumption = match form.monthly_consumption {
        None => {
            errors.insert("monthly_consumption".to_string(), "Monthly consumption is required".to_string());
            None
        }
        Some(c) if !c.is_finite() || c <= 0.0 => {
            errors.insert("monthly_consumption".to_string(), "Monthly consumption must be greater than zero".to_string());
            None
        }
        Some(c) => Some(c),
    };

    let location = match &form.location {
        None => {
            errors.insert("location".to_string(), "Pick a location on the map".to_string());
            None
        }
        Some(loc) if !(-90.0..=90.0).contains(&loc.lat) || !(-180.0..=180.0).contains(&loc.lng) => {
            errors.insert("location".to_string(), "Coordinates are out of range".to_string());
            None
        }
        Some(loc) => Some(loc.clone()),
    };

    let panel = match form.panel_type.as_deref().map(str::trim) {
        None | Some("") => {
            errors.insert("panel_type".to_string(), "Select a panel type".to_string());
            None
        }
        Some(s) => match s.parse::<PanelTechnology>() {
            Ok(p) => Some(p),
            Err(e) => {
                errors.insert("panel_type".to_string(), format!("Unknown panel type: {}", e.0));
                None
            }
        },
    };

    let system = match form.system_type.as_deref().map(str::trim) {
        None | Some("") => {
            errors.insert("system_type".to_string(), "Select a system type".to_string());
            None
        }
        Some(s) => match s.parse::<SystemTopology>() {
            Ok(t) => Some(t),
            Err(e) => {
                errors.insert("system_type".to_string(), format!("Unknown system type: {}", e.0));
                None
            }
        },
    };

    match (consumption, location, panel, system) {
        (Some(monthly_consumption_kwh), Some(location), Some(panel), Some(system)) => Ok(QuoteRequest {
            monthly_consumption_kwh,
            location,
            panel,
            system,
        }),
        _ => Err(QuoteError::Validation(errors)),
    }
}

/// Smallest `n` with `(n - 1) * per_panel < consumption <= n * per_panel`.
///
/// The float quotient can land a hair above an exact integer; the
/// correction steps keep the bound exact as evaluated.
///
/// `None` when the array would need more than `u32::MAX` panels.
fn panels_for(consumption: f64, per_panel: f64) -> Option<u32> {
    let estimate = (consumption / per_panel).ceil().max(1.0);
    if !estimate.is_finite() || estimate > f64::from(u32::MAX) {
        return None;
    }
    let mut n = estimate as u32;
    while n > 1 && f64::from(n - 1) * per_panel >= consumption {
        n -= 1;
    }
    while f64::from(n) * per_panel < consumption {
        n = n.checked_add(1)?;
    }
    Some(n)
}

/// Deterministic quote for a validated request and a resolved irradiance
/// (kWh/m²/day).
pub fn calculate(req: &QuoteRequest, irradiance: f64) -> Result<QuoteResult, QuoteError> {
    if !irradiance.is_finite() || irradiance <= 0.0 {
        return Err(QuoteError::Computation(format!("irradiance must be positive, got {irradiance}")));
    }
    let panel = req.panel.profile();
    let system = req.system.profile();

    // ── 1. Energy per panel ──────────────────────────────────────
    let daily_energy_per_panel = irradiance * panel.power_kw * INVERTER_EFFICIENCY * SYSTEM_EFFICIENCY;
    let monthly_energy_per_panel = daily_energy_per_panel * DAYS_PER_MONTH;
    if monthly_energy_per_panel <= 0.0 || !monthly_energy_per_panel.is_finite() {
        return Err(QuoteError::Computation(format!(
            "panel '{}' yields no energy",
            req.panel
        )));
    }

    // ── 2. Sizing ────────────────────────────────────────────────
    let Some(panels_needed) = panels_for(req.monthly_consumption_kwh, monthly_energy_per_panel) else {
        return Err(QuoteError::Validation(FieldErrors::from([(
            "monthly_consumption".to_string(),
            "Monthly consumption is too large to size a system".to_string(),
        )])));
    };
    let n = f64::from(panels_needed);
    let total_power = n * panel.power_kw;

    // ── 3. Generation ────────────────────────────────────────────
    let monthly_generation = n * monthly_energy_per_panel;
    let yearly_generation = monthly_generation * 12.0;

    // ── 4. Cost ──────────────────────────────────────────────────
    let panels_cost = n * panel.power_kw * 1000.0 * panel.cost_per_watt;
    let inverter_cost = total_power * INVERTER_COST_PER_KW;
    let installation_cost = panels_cost * INSTALLATION_SHARE;
    let additional_cost = panels_cost * BALANCE_OF_SYSTEM_SHARE + system.battery_cost;
    let total_cost = (panels_cost + inverter_cost + installation_cost + additional_cost) * system.multiplier;

    // ── 5. Savings ───────────────────────────────────────────────
    let monthly_savings = monthly_generation * ELECTRICITY_RATE;
    let yearly_savings = monthly_savings * 12.0;
    let payback_period = (yearly_savings > 0.0).then(|| total_cost / yearly_savings);

    // ── 6. Environment ───────────────────────────────────────────
    let co2_reduction = yearly_generation * CO2_FACTOR;

    #[cfg(feature = "verbose_log")]
    tracing::debug!(
        panel = %req.panel,
        system = %req.system,
        irradiance,
        daily_energy_per_panel,
        monthly_energy_per_panel,
        panels_needed,
        total_cost,
        "quote computed"
    );

    Ok(QuoteResult {
        panels_needed,
        total_power,
        monthly_generation,
        yearly_generation,
        system_cost: CostBreakdown {
            panels: panels_cost,
            inverter: inverter_cost,
            installation: installation_cost,
            additional: additional_cost,
            total: total_cost,
        },
        savings: Savings {
            monthly: monthly_savings,
            yearly: yearly_savings,
            payback_period,
        },
        technical_details: TechnicalDetails {
            solar_radiation: irradiance,
            system_efficiency: SYSTEM_EFFICIENCY * 100.0,
            inverter_efficiency: INVERTER_EFFICIENCY * 100.0,
            performance_ratio: SYSTEM_EFFICIENCY * INVERTER_EFFICIENCY * 100.0,
        },
        environmental: Environmental { co2_reduction },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quote::Location;
    use approx::assert_abs_diff_eq;

    fn request(consumption: f64, panel: PanelTechnology, system: SystemTopology) -> QuoteRequest {
        QuoteRequest {
            monthly_consumption_kwh: consumption,
            location: Location { address: "Santa Cruz".into(), lat: -17.8146, lng: -63.1561 },
            panel,
            system,
        }
    }

    fn per_panel(irradiance: f64, panel: PanelTechnology) -> f64 {
        irradiance * panel.profile().power_kw * INVERTER_EFFICIENCY * SYSTEM_EFFICIENCY * DAYS_PER_MONTH
    }

    #[test]
    fn test_grid_tied_monocrystalline() {
        let r = calculate(&request(300.0, PanelTechnology::Monocrystalline, SystemTopology::GridTied), 5.0).unwrap();
        assert_abs_diff_eq!(per_panel(5.0, PanelTechnology::Monocrystalline), 76.95, epsilon = 1e-9);
        assert_eq!(r.panels_needed, 4);
        assert_abs_diff_eq!(r.total_power, 2.4, epsilon = 1e-9);
        assert_abs_diff_eq!(r.monthly_generation, 307.8, epsilon = 1e-9);
        assert_abs_diff_eq!(r.yearly_generation, 3693.6, epsilon = 1e-9);
        assert_abs_diff_eq!(r.system_cost.panels, 1920.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.system_cost.inverter, 480.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.system_cost.installation, 576.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.system_cost.additional, 384.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.system_cost.total, 3360.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.savings.monthly, 36.936, epsilon = 1e-9);
        assert_abs_diff_eq!(r.savings.yearly, 443.232, epsilon = 1e-9);
        assert_abs_diff_eq!(r.savings.payback_period.unwrap(), 3360.0 / 443.232, epsilon = 1e-9);
        assert_abs_diff_eq!(r.environmental.co2_reduction, 1846.8, epsilon = 1e-9);
        assert_abs_diff_eq!(r.technical_details.performance_ratio, 85.5, epsilon = 1e-9);
        assert_eq!(r.technical_details.solar_radiation, 5.0);
    }

    #[test]
    fn test_off_grid_adds_scaled_battery() {
        let a = calculate(&request(300.0, PanelTechnology::Monocrystalline, SystemTopology::GridTied), 5.0).unwrap();
        let b = calculate(&request(300.0, PanelTechnology::Monocrystalline, SystemTopology::OffGrid), 5.0).unwrap();
        assert_eq!(a.panels_needed, b.panels_needed);
        assert!(b.system_cost.total - a.system_cost.total >= 2000.0 * 1.3);
        assert_abs_diff_eq!(b.system_cost.total, (3360.0 + 2000.0) * 1.3, epsilon = 1e-9);
    }

    #[test]
    fn test_panel_count_bounds() {
        for panel in PanelTechnology::ALL {
            for irradiance in [3.5, 4.5, 4.8, 5.2, 5.8, 6.7] {
                let m = per_panel(irradiance, panel);
                for c in [0.5, 1.0, 76.95, 150.0, 299.9, 300.0, 1234.5, 10_000.0] {
                    let r = calculate(&request(c, panel, SystemTopology::Hybrid), irradiance).unwrap();
                    let n = f64::from(r.panels_needed);
                    assert!(r.panels_needed >= 1);
                    assert!((n - 1.0) * m < c, "{panel} {irradiance} {c}: over-sized");
                    assert!(c <= n * m, "{panel} {irradiance} {c}: under-sized");
                }
            }
        }
    }

    #[test]
    fn test_exact_multiple_is_not_rounded_up() {
        for panel in PanelTechnology::ALL {
            let m = per_panel(5.0, panel);
            for k in 1..=40u32 {
                let r = calculate(&request(m * f64::from(k), panel, SystemTopology::GridTied), 5.0).unwrap();
                assert_eq!(r.panels_needed, k, "{panel} k={k}");
            }
        }
    }

    #[test]
    fn test_cost_monotonic_in_panel_count() {
        for system in SystemTopology::ALL {
            let mut last: Option<(u32, f64)> = None;
            for step in 1..200 {
                let r = calculate(&request(f64::from(step) * 25.0, PanelTechnology::Bifacial, system), 4.8).unwrap();
                if let Some((n, cost)) = last {
                    assert!(r.panels_needed >= n);
                    assert!(r.system_cost.total >= cost);
                }
                last = Some((r.panels_needed, r.system_cost.total));
            }
        }
    }

    #[test]
    fn test_oversized_consumption_is_rejected() {
        for c in [1.0e12, 1.0e300, f64::MAX] {
            let req = request(c, PanelTechnology::Monocrystalline, SystemTopology::GridTied);
            let Err(QuoteError::Validation(errors)) = calculate(&req, 5.0) else {
                panic!("consumption {c} must not be sized");
            };
            assert!(errors.contains_key("monthly_consumption"));
        }
    }

    #[test]
    fn test_largest_sizable_consumption() {
        let m = per_panel(5.8, PanelTechnology::Bifacial);
        let r = calculate(&request(m * 1.0e9, PanelTechnology::Bifacial, SystemTopology::OffGrid), 5.8).unwrap();
        assert!(r.panels_needed >= 999_999_999 && r.panels_needed <= 1_000_000_001);
    }

    #[test]
    fn test_idempotent() {
        let req = request(512.3, PanelTechnology::Polycrystalline, SystemTopology::Hybrid);
        let a = calculate(&req, 5.37).unwrap();
        let b = calculate(&req, 5.37).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.system_cost.total.to_bits(), b.system_cost.total.to_bits());
    }

    #[test]
    fn test_non_positive_irradiance_is_computation_error() {
        let req = request(300.0, PanelTechnology::Monocrystalline, SystemTopology::GridTied);
        assert!(matches!(calculate(&req, 0.0), Err(QuoteError::Computation(_))));
        assert!(matches!(calculate(&req, f64::NAN), Err(QuoteError::Computation(_))));
    }

    #[test]
    fn test_validate_complete_form() {
        let form = QuoteForm {
            monthly_consumption: Some(300.0),
            location: Some(Location { address: String::new(), lat: -17.8, lng: -63.1 }),
            panel_type: Some("monocrystalline".into()),
            system_type: Some("off-grid".into()),
        };
        let req = validate(&form).unwrap();
        assert_eq!(req.panel, PanelTechnology::Monocrystalline);
        assert_eq!(req.system, SystemTopology::OffGrid);
        assert_eq!(req.monthly_consumption_kwh, 300.0);
    }

    #[test]
    fn test_validate_reports_every_field() {
        let Err(QuoteError::Validation(errors)) = validate(&QuoteForm::default()) else {
            panic!("empty form must fail validation");
        };
        assert_eq!(
            errors.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["location", "monthly_consumption", "panel_type", "system_type"]
        );
    }

    #[test]
    fn test_validate_rejects_zero_consumption_and_unknown_selectors() {
        let form = QuoteForm {
            monthly_consumption: Some(0.0),
            location: Some(Location { address: String::new(), lat: 10.0, lng: 10.0 }),
            panel_type: Some("thin-film".into()),
            system_type: Some("grid-tied".into()),
        };
        let Err(QuoteError::Validation(errors)) = validate(&form) else {
            panic!("zero consumption must fail validation");
        };
        assert!(errors.contains_key("monthly_consumption"));
        assert!(errors.contains_key("panel_type"));
        assert!(!errors.contains_key("system_type"));
        assert!(!errors.contains_key("location"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_coordinates() {
        let form = QuoteForm {
            monthly_consumption: Some(100.0),
            location: Some(Location { address: String::new(), lat: 91.0, lng: 0.0 }),
            panel_type: Some("bifacial".into()),
            system_type: Some("hybrid".into()),
        };
        let Err(QuoteError::Validation(errors)) = validate(&form) else {
            panic!("latitude 91 must fail validation");
        };
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("location"));
    }
}
