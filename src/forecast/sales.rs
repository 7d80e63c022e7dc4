//! Random-forest sales forecaster with JSON persistence

use chrono::{Duration, NaiveDate, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ModelConfig;
use crate::error::{AppError, Result};
use crate::forecast::features::{calendar_features, FEATURE_NAMES};
use crate::forecast::forest::{ForestParams, RandomForest};
use crate::forecast::history::{
    generate_sample_history, history_start, HistoryShape, SalesObservation,
};
use crate::forecast::metrics::{mean_absolute_error, root_mean_squared_error, train_test_split};
use crate::forecast::{ForecastRecord, Forecaster, TrainingReport};

const MODEL_FORMAT_VERSION: u32 = 2;

/// Settings a persisted model was trained with. A model trained under
/// different settings is retrained rather than reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TrainingParams {
    periods: usize,
    n_estimators: usize,
    max_depth: usize,
    min_samples_split: usize,
    test_fraction: f64,
    seed: u64,
}

impl From<&ModelConfig> for TrainingParams {
    fn from(config: &ModelConfig) -> Self {
        Self {
            periods: config.periods,
            n_estimators: config.n_estimators,
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            test_fraction: config.test_fraction,
            seed: config.seed,
        }
    }
}

/// On-disk representation of a trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredModel {
    format_version: u32,
    features: Vec<String>,
    params: TrainingParams,
    report: TrainingReport,
    forest: RandomForest,
}

/// How [`SalesForecaster::initialize`] obtained its model
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    Loaded(TrainingReport),
    Trained(TrainingReport),
}

impl ModelSource {
    pub fn report(&self) -> &TrainingReport {
        match self {
            ModelSource::Loaded(r) | ModelSource::Trained(r) => r,
        }
    }
}

/// Forecaster backed by a [`RandomForest`] over calendar features
pub struct SalesForecaster {
    config: ModelConfig,
    model: RwLock<Option<Arc<StoredModel>>>,
    training: Mutex<()>,
}

impl SalesForecaster {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            model: RwLock::new(None),
            training: Mutex::new(()),
        }
    }

    /// Load the persisted model if there is a usable one, otherwise train
    pub fn initialize(&self) -> Result<ModelSource> {
        let path = Path::new(&self.config.path);
        if self.config.persist && path.exists() {
            match self.load() {
                Ok(report) => return Ok(ModelSource::Loaded(report)),
                Err(e) => warn!(
                    path = %path.display(),
                    error = %e,
                    "Persisted model unusable, retraining"
                ),
            }
        }
        self.train().map(ModelSource::Trained)
    }

    /// Fit the forest on `history`, evaluate it on a hold-out split and make it current
    pub fn train_on(&self, history: &[SalesObservation]) -> Result<TrainingReport> {
        let x: Vec<Vec<f64>> = history.iter().map(|o| calendar_features(o.date)).collect();
        let y: Vec<f64> = history.iter().map(|o| o.sales).collect();

        let (train_idx, test_idx) =
            train_test_split(history.len(), self.config.test_fraction, self.config.seed);
        if train_idx.is_empty() || test_idx.is_empty() {
            return Err(AppError::Training(format!(
                "Cannot split {} observations for training and evaluation",
                history.len()
            )));
        }

        let x_train: Vec<Vec<f64>> = train_idx.iter().map(|&i| x[i].clone()).collect();
        let y_train: Vec<f64> = train_idx.iter().map(|&i| y[i]).collect();
        let x_test: Vec<Vec<f64>> = test_idx.iter().map(|&i| x[i].clone()).collect();
        let y_test: Vec<f64> = test_idx.iter().map(|&i| y[i]).collect();

        let forest = RandomForest::fit(
            &x_train,
            &y_train,
            ForestParams {
                n_estimators: self.config.n_estimators,
                max_depth: self.config.max_depth,
                min_samples_split: self.config.min_samples_split,
                seed: self.config.seed,
            },
        )?;

        let predicted = forest.predict(&x_test)?;
        let report = TrainingReport {
            train_samples: x_train.len(),
            test_samples: x_test.len(),
            mae: mean_absolute_error(&y_test, &predicted),
            rmse: root_mean_squared_error(&y_test, &predicted),
            n_estimators: forest.n_trees(),
            trained_at: Utc::now(),
        };

        info!(
            mae = report.mae,
            rmse = report.rmse,
            train_samples = report.train_samples,
            test_samples = report.test_samples,
            "Model trained"
        );

        let stored = StoredModel {
            format_version: MODEL_FORMAT_VERSION,
            features: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            params: TrainingParams::from(&self.config),
            report: report.clone(),
            forest,
        };

        if self.config.persist {
            if let Err(e) = self.save(&stored) {
                warn!(path = %self.config.path, error = %e, "Failed to persist model");
            }
        }

        *self.model.write() = Some(Arc::new(stored));
        Ok(report)
    }

    /// Replace the current model with the one persisted at the configured path
    pub fn load(&self) -> Result<TrainingReport> {
        let content = std::fs::read_to_string(&self.config.path)?;
        let stored: StoredModel = serde_json::from_str(&content)?;

        if stored.format_version != MODEL_FORMAT_VERSION {
            return Err(AppError::Storage(format!(
                "Unsupported model format version {}",
                stored.format_version
            )));
        }
        if stored.features != FEATURE_NAMES {
            return Err(AppError::Storage(format!(
                "Model was trained on features {:?}",
                stored.features
            )));
        }
        if stored.forest.n_features() != FEATURE_NAMES.len() {
            return Err(AppError::Storage(format!(
                "Model expects {} features",
                stored.forest.n_features()
            )));
        }
        if stored.params != TrainingParams::from(&self.config) {
            return Err(AppError::Storage(format!(
                "Model was trained with different settings: {:?}",
                stored.params
            )));
        }
        stored.forest.validate()?;

        let report = stored.report.clone();
        *self.model.write() = Some(Arc::new(stored));
        info!(path = %self.config.path, "Model loaded from file");
        Ok(report)
    }

    fn save(&self, stored: &StoredModel) -> Result<()> {
        let path = Path::new(&self.config.path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec(stored)?)?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    /// Forecast `days` consecutive days beginning at `start`
    pub fn forecast_from(&self, start: NaiveDate, days: u32) -> Result<Vec<ForecastRecord>> {
        if days == 0 || days > self.config.max_horizon {
            return Err(AppError::InvalidRequest(format!(
                "days must be between 1 and {}, got {}",
                self.config.max_horizon, days
            )));
        }

        let model = self
            .model
            .read()
            .clone()
            .ok_or_else(|| AppError::ModelNotReady("the model has not been trained".to_string()))?;

        let dates = (0..i64::from(days))
            .map(|i| {
                start.checked_add_signed(Duration::days(i)).ok_or_else(|| {
                    AppError::InvalidRequest(format!(
                        "Forecast of {} days from {} runs past the last representable date",
                        days, start
                    ))
                })
            })
            .collect::<Result<Vec<NaiveDate>>>()?;
        let rows: Vec<Vec<f64>> = dates.iter().map(|d| calendar_features(*d)).collect();
        let predictions = model.forest.predict(&rows)?;

        Ok(dates
            .into_iter()
            .zip(predictions)
            .map(|(date, sales)| ForecastRecord::new(date, sales))
            .collect())
    }

    /// Report of the model currently in use
    pub fn report(&self) -> Option<TrainingReport> {
        self.model.read().as_ref().map(|m| m.report.clone())
    }
}

impl Forecaster for SalesForecaster {
    fn name(&self) -> &str {
        "random_forest"
    }

    fn is_ready(&self) -> bool {
        self.model.read().is_some()
    }

    fn train(&self) -> Result<TrainingReport> {
        let history = generate_sample_history(
            history_start(),
            self.config.periods,
            HistoryShape::default(),
            self.config.seed,
        )?;
        self.train_on(&history)
    }

    fn forecast(&self, days: u32) -> Result<Vec<ForecastRecord>> {
        let tomorrow = Utc::now()
            .date_naive()
            .succ_opt()
            .ok_or_else(|| AppError::Internal("No date after today".to_string()))?;
        self.forecast_from(tomorrow, days)
    }

    fn ensure_ready(&self) -> Result<()> {
        let _guard = self.training.lock();
        if self.is_ready() {
            return Ok(());
        }
        self.train().map(|_| ())
    }
}
