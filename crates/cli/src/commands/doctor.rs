use serde::Serialize;
use storefront_core::config::{AppConfig, LoadOptions};
use storefront_db::{connect_with_settings, CatalogSeed, SEED_PRODUCTS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.extend(check_database(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["database_connectivity", "catalog_readiness"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    summarize(checks)
}

fn summarize(checks: Vec<DoctorCheck>) -> DoctorReport {
    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// Connectivity, then whether the catalog table exists and holds the seed set.
/// Does not migrate or seed.
fn check_database(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return vec![DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            }];
        }
    };

    runtime.block_on(async {
        let pool = match connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        {
            Ok(pool) => pool,
            Err(error) => {
                return vec![
                    DoctorCheck {
                        name: "database_connectivity",
                        status: CheckStatus::Fail,
                        details: format!("failed to connect to database: {error}"),
                    },
                    DoctorCheck {
                        name: "catalog_readiness",
                        status: CheckStatus::Skipped,
                        details: "skipped because the database is unreachable".to_string(),
                    },
                ];
            }
        };

        let connectivity = DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Pass,
            details: format!("connected using `{}`", config.database.url),
        };
        let catalog = catalog_check(CatalogSeed::missing_products(&pool).await);
        pool.close().await;

        vec![connectivity, catalog]
    })
}

fn catalog_check<E: std::fmt::Display>(missing: Result<Vec<&'static str>, E>) -> DoctorCheck {
    match missing {
        Ok(missing) if missing.is_empty() => DoctorCheck {
            name: "catalog_readiness",
            status: CheckStatus::Pass,
            details: format!("all {} seed products present", SEED_PRODUCTS.len()),
        },
        Ok(missing) => DoctorCheck {
            name: "catalog_readiness",
            status: CheckStatus::Fail,
            details: format!(
                "{} of {} seed products missing; run `storefront seed`",
                missing.len(),
                SEED_PRODUCTS.len()
            ),
        },
        Err(error) => DoctorCheck {
            name: "catalog_readiness",
            status: CheckStatus::Fail,
            details: format!("catalog query failed (run `storefront migrate`): {error}"),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
