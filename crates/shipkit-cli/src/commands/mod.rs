use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use serde::Serialize;
use shipkit_core::auth::AccessToken;
use shipkit_core::carriers::{freight, parcel};
use shipkit_core::error::ApiError;
use shipkit_core::geometry::Shipment;
use shipkit_core::{
    ApiOutcome, ApiResult, CarrierDescriptor, CarrierRegistry, HttpTransport, Operation, Request,
    ShipkitError, ShippingMethod, Transport,
};
use tracing::debug;

use crate::cli::{Commands, OperationArg, OperationArgs};

mod support;

use self::support::{print_json, read_document};

const PLACEHOLDER_FREIGHT_URL: &str = "https://freight.invalid";
const PLACEHOLDER_PARCEL_URL: &str = "https://parcel.invalid";
const PLACEHOLDER_SECRET: &str = "<unset>";

pub(crate) fn run(command: Commands) -> Result<()> {
    let registry = CarrierRegistry::builtin();
    match command {
        Commands::Carriers => print_json(&registry.iter().collect::<Vec<_>>()),
        Commands::Methods(args) => {
            let carrier = registry.require(&args.carrier)?;
            let methods = carrier
                .shipping_methods_from(args.origin.as_deref())
                .collect::<Vec<_>>();
            print_json(&methods)
        }
        Commands::Serialize(args) => {
            let plan = OperationPlan::load(&registry, &args)?;
            print_json(&plan.serialize()?)
        }
        Commands::Run(args) => {
            let plan = OperationPlan::load(&registry, &args)?;
            let transport = HttpTransport::from_env().context("failed to build http transport")?;
            plan.run(&transport)
        }
    }
}

#[derive(Debug)]
enum CarrierOptions {
    Freight(freight::LoadOptions),
    Parcel(parcel::ParcelShipmentOptions),
}

/// A validated operation: carrier, capability, shipment and options.
#[derive(Debug)]
struct OperationPlan {
    carrier: &'static CarrierDescriptor,
    operation: OperationArg,
    shipment: Shipment,
    options: CarrierOptions,
    service: Option<String>,
}

impl OperationPlan {
    fn load(registry: &CarrierRegistry, args: &OperationArgs) -> Result<Self> {
        let carrier = builtin_descriptor(registry.require(&args.carrier)?.code)?;
        let capability = args.operation.capability();
        if !carrier.supports(capability) {
            return Err(ShipkitError::UnsupportedOperation {
                carrier: carrier.code.to_string(),
                operation: capability.to_string(),
            }
            .into());
        }

        let shipment = read_document::<Shipment>(&args.shipment)?;
        let options = match carrier.code {
            freight::CARRIER_CODE => CarrierOptions::Freight(
                freight::LoadOptions::try_from(read_document::<freight::LoadInput>(
                    &args.options,
                )?)
                .context("invalid freight options")?,
            ),
            _ => CarrierOptions::Parcel(
                parcel::ParcelShipmentOptions::try_from(read_document::<
                    parcel::ParcelShipmentInput,
                >(&args.options)?)
                .context("invalid parcel options")?,
            ),
        };

        Ok(Self {
            carrier,
            operation: args.operation,
            shipment,
            options,
            service: args.service.clone(),
        })
    }

    fn service(&self) -> Result<&'static ShippingMethod> {
        let code = self
            .service
            .as_deref()
            .ok_or_else(|| anyhow!("--service is required for {}", self.operation_name()))?;
        let origin = self.shipment.origin.country_code.as_str();
        self.carrier
            .shipping_method(code, Some(origin))
            .ok_or_else(|| {
                anyhow!(
                    "{} has no service {code} shipping from {origin}",
                    self.carrier.code
                )
            })
    }

    fn operation_name(&self) -> &'static str {
        self.operation.capability().as_str()
    }

    fn unsupported(&self) -> anyhow::Error {
        ShipkitError::UnsupportedOperation {
            carrier: self.carrier.code.to_string(),
            operation: self.operation_name().to_string(),
        }
        .into()
    }

    /// Builds the request without touching the network. Credentials come from
    /// the environment when present, placeholders otherwise.
    fn serialize(&self) -> Result<Request> {
        let request = match &self.options {
            CarrierOptions::Freight(options) => {
                let credentials = freight::FreightCredentials::from_env().unwrap_or_else(|err| {
                    debug!(error = %err, "using placeholder freight credentials");
                    freight::FreightCredentials::new(PLACEHOLDER_FREIGHT_URL, PLACEHOLDER_SECRET)
                });
                match self.operation {
                    OperationArg::Load => {
                        freight::CreateLoad::new(&credentials).serialize(&self.shipment, options)
                    }
                    OperationArg::Rates => {
                        freight::RateQuote::new(&credentials).serialize(&self.shipment, options)
                    }
                    OperationArg::Labels | OperationArg::Timings => return Err(self.unsupported()),
                }
            }
            CarrierOptions::Parcel(options) => {
                let credentials = parcel::ParcelCredentials::from_env().unwrap_or_else(|err| {
                    debug!(error = %err, "using placeholder parcel credentials");
                    parcel::ParcelCredentials::new(
                        PLACEHOLDER_PARCEL_URL,
                        PLACEHOLDER_SECRET,
                        PLACEHOLDER_SECRET,
                    )
                });
                let token = AccessToken::new(PLACEHOLDER_SECRET, Utc::now(), 0);
                match self.operation {
                    OperationArg::Labels => {
                        parcel::Labels::new(&credentials, &token, self.service()?)
                            .serialize(&self.shipment, options)
                    }
                    OperationArg::Timings => parcel::Timings::new(&credentials, &token)
                        .serialize(&self.shipment, options),
                    OperationArg::Rates => {
                        parcel::Rates::new(&credentials, &token).serialize(&self.shipment, options)
                    }
                    OperationArg::Load => return Err(self.unsupported()),
                }
            }
        };
        Ok(request)
    }

    fn run<T: Transport>(&self, transport: &T) -> Result<()> {
        match &self.options {
            CarrierOptions::Freight(options) => {
                let client =
                    freight::FreightClient::new(freight::FreightCredentials::from_env()?, transport);
                match self.operation {
                    OperationArg::Load => self.report(client.create_load(&self.shipment, options)),
                    OperationArg::Rates => self.report(client.rate_quote(&self.shipment, options)),
                    OperationArg::Labels | OperationArg::Timings => Err(self.unsupported()),
                }
            }
            CarrierOptions::Parcel(options) => {
                let client =
                    parcel::ParcelClient::new(parcel::ParcelCredentials::from_env()?, transport);
                match self.operation {
                    OperationArg::Labels => {
                        self.report(client.labels(&self.shipment, options, self.service()?))
                    }
                    OperationArg::Timings => self.report(client.timings(&self.shipment, options)),
                    OperationArg::Rates => self.report(client.rates(&self.shipment, options)),
                    OperationArg::Load => Err(self.unsupported()),
                }
            }
        }
    }

    fn report<D: Serialize>(&self, result: ApiResult<D>) -> Result<()> {
        match result {
            Ok(outcome) => print_json(&outcome),
            Err(failure) => {
                print_json(&FailureReport::new(
                    &failure,
                    self.operation_name(),
                    self.carrier.code,
                ))?;
                bail!(
                    "{} {} failed: {}",
                    self.carrier.code,
                    self.operation_name(),
                    failure.data
                )
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct FailureReport<'a> {
    error: shipkit_core::error::ErrorPayload,
    original_request: &'a Request,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_response: Option<&'a shipkit_core::Response>,
}

impl<'a> FailureReport<'a> {
    fn new(failure: &'a ApiOutcome<ApiError>, operation: &str, carrier: &str) -> Self {
        Self {
            error: ShipkitError::Api(failure.data.clone())
                .to_payload(operation, Some(carrier.to_string())),
            original_request: failure.request(),
            original_response: failure.response(),
        }
    }
}

/// Maps a registered code back to the compiled-in descriptor, whose
/// operations this binary knows how to run.
fn builtin_descriptor(code: &str) -> Result<&'static CarrierDescriptor> {
    match code {
        freight::CARRIER_CODE => Ok(&freight::DESCRIPTOR),
        parcel::CARRIER_CODE => Ok(&parcel::DESCRIPTOR),
        other => Err(ShipkitError::UnknownCarrier(other.to_string()).into()),
    }
}
