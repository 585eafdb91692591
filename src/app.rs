use std::io::Write;

use vendcast_core::{AppError, Config, StoreBackend};
use vendcast_forecast::{
    best_selling_summary, build_daily_forecast, calculate_weekly_summary, DailyWeather,
};
use vendcast_services::{
    validate_input, MachineBackend, MachineStoreError, MemoryMachineStore, SqliteMachineStore,
};
use vendcast_weather::WeatherService;

use crate::cli::Command;
use crate::dashboard;

/// Application state: configuration plus the machine store
pub struct App {
    config: Config,
    store: Box<dyn MachineBackend>,
}

impl App {
    /// Open the configured machine store under the config directory
    pub fn new(config: Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.config_dir)?;
        let seed = config.store.seed_on_first_run;
        let store: Box<dyn MachineBackend> = match config.store.backend {
            StoreBackend::Sqlite => {
                Box::new(SqliteMachineStore::open(&config.database_path(), seed)?)
            }
            StoreBackend::Json => {
                Box::new(MemoryMachineStore::open_file(&config.machines_json_path(), seed)?)
            }
        };
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Box<dyn MachineBackend>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run<W: Write>(&self, command: Command, out: &mut W) -> Result<(), AppError> {
        tracing::debug!("Running {:?}", command);

        match command {
            Command::Dashboard => self.dashboard(out).await,
            Command::Machines => self.machines(out),
            Command::Add(raw) => {
                let input = self.validate(raw, out)?;
                let machine = self.store.add(input)?;
                writeln!(out, "Added {} ({})", machine.id, machine.name)?;
                Ok(())
            }
            Command::Update { id, input } => {
                let input = self.validate(input, out)?;
                let machine = self.store.update(&id, input)?;
                writeln!(out, "Updated {} ({})", machine.id, machine.name)?;
                Ok(())
            }
            Command::Remove { id } => {
                self.store.remove(&id)?;
                writeln!(out, "Removed {}", id)?;
                Ok(())
            }
        }
    }

    /// Convert the margin from the configured unit and print each rejected field
    fn validate<W: Write>(
        &self,
        raw: vendcast_forecast::MachineInput,
        out: &mut W,
    ) -> Result<vendcast_forecast::MachineInput, AppError> {
        match validate_input(raw, self.config.machines.margin_unit) {
            Ok(input) => Ok(input),
            Err(errors) => {
                for error in &errors.errors {
                    writeln!(out, "{}: {}", error.field, error.message)?;
                }
                Err(MachineStoreError::from(errors).into())
            }
        }
    }

    fn machines<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        let machines = self.store.list()?;
        write!(
            out,
            "{}",
            dashboard::render_machines(&machines, self.config.display.fraction_digits)
        )?;
        Ok(())
    }

    async fn dashboard<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        let digits = self.config.display.fraction_digits;
        let machines = self.store.snapshot()?;
        let weather = self.weather(out).await?;

        let daily = build_daily_forecast(&machines, &weather);
        let best = best_selling_summary(&machines);

        write!(out, "{}", dashboard::render_machines(&machines, digits))?;
        writeln!(out)?;
        let days = self.config.weather.forecast_days;
        write!(out, "{}", dashboard::render_forecast(&daily, days, digits))?;

        // Nothing to summarize without both machines and forecast rows
        if !machines.is_empty() && !daily.is_empty() {
            let summary = calculate_weekly_summary(&machines, &daily);
            writeln!(out)?;
            write!(out, "{}", dashboard::render_weekly_summary(&summary, daily.len(), digits))?;
        }

        let best_card = dashboard::render_best_location(best.as_ref(), digits);
        if !best_card.is_empty() {
            writeln!(out)?;
            write!(out, "{}", best_card)?;
        }
        Ok(())
    }

    /// Daily series for the dashboard; empty when nothing could be fetched
    async fn weather<W: Write>(&self, out: &mut W) -> Result<Vec<DailyWeather>, AppError> {
        let mut service = match WeatherService::new(&self.config) {
            Ok(service) => service,
            Err(e) => {
                writeln!(out, "Failed to fetch weather data: {}", e)?;
                return Ok(Vec::new());
            }
        };

        match service.daily_series().await {
            Ok(series) => {
                let location = service.location();
                tracing::info!(
                    "Weather for {:.3},{:.3}: {} days ({:?}, fetched {})",
                    location.latitude,
                    location.longitude,
                    series.days.len(),
                    series.source,
                    series.fetched_at
                );
                Ok(series.days)
            }
            Err(e) => {
                let reason = e.to_string();
                let app_error: AppError = e.into();
                tracing::warn!("{}", app_error.user_message());
                writeln!(out, "Failed to fetch weather data: {}", reason)?;
                writeln!(out)?;
                Ok(Vec::new())
            }
        }
    }
}
