// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Campus service subcommands. Every result is printed as pretty JSON.

use anyhow::{Context, Result};
use ncstate_core::{NcstateConfig, ResponseFormat};
use ncstate_service::remedy::FieldMap;
use ncstate_service::{
    BuildingDirectory, Diet, DiningClient, LdapConnector, Meal, MenuDate, OucClient, RemedyClient,
    UnitDirectory, UserContext, UserDirectory,
};
use tracing::debug;

use super::print_json;
use crate::args::{DiningAction, DirectoryAction, OucAction, RemedyAction};

fn format_for(xml: bool) -> ResponseFormat {
    if xml { ResponseFormat::Xml } else { ResponseFormat::Json }
}

pub async fn dining(config: &NcstateConfig, action: DiningAction, xml: bool) -> Result<()> {
    let mut client = DiningClient::new(&config.dining, &config.http)?;
    client.set_format(format_for(xml));

    let result = match action {
        DiningAction::Menu { location, meal, date, diet } => {
            let meal = meal.as_deref().map(str::parse::<Meal>).transpose()?;
            let date = date.as_deref().map(str::parse::<MenuDate>).transpose()?;
            let diet = diet.as_deref().map(str::parse::<Diet>).transpose()?;
            client.get_menu(&location, meal, date, diet).await?
        }
        DiningAction::Hours { location, date } => {
            let date = date.as_deref().map(str::parse::<MenuDate>).transpose()?;
            client.get_hours(&location, date).await?
        }
        DiningAction::Locations { location_type } => {
            client.get_locations(location_type.as_deref()).await?
        }
        DiningAction::Types => client.get_location_types().await?,
    };
    print_json(&result)
}

pub async fn ouc(config: &NcstateConfig, action: OucAction, xml: bool) -> Result<()> {
    let mut client = OucClient::new(&config.ouc, &config.http)?;
    client.set_format(format_for(xml));

    let result = match action {
        OucAction::Get { code } => client.get_ouc(&code).await?,
        OucAction::All { order } => client.get_all(order.as_deref()).await?,
        OucAction::Search { term } => client.search(&term).await?,
    };
    print_json(&result)
}

pub async fn directory(
    config: &NcstateConfig,
    action: DirectoryAction,
    bind_dn: &str,
    password: &str,
    fields: &[String],
) -> Result<()> {
    let connector = LdapConnector::connect(&config.ldap, bind_dn, password)
        .await
        .context("binding to the campus directory")?;
    let fields: Vec<&str> = fields.iter().map(String::as_str).collect();

    let (entries, connector) = match action {
        DirectoryAction::User { unity_id, context } => {
            let mut users = UserDirectory::new(connector);
            let entries = users
                .find_by_unity_id(&unity_id, UserContext::parse(&context)?, &fields)
                .await?;
            (entries, users.into_inner())
        }
        DirectoryAction::CampusId { campus_id, context } => {
            let mut users = UserDirectory::new(connector);
            let entries = users
                .find_by_campus_id(&campus_id, UserContext::parse(&context)?, &fields)
                .await?;
            (entries, users.into_inner())
        }
        DirectoryAction::Buildings => {
            let mut buildings = BuildingDirectory::new(connector);
            (buildings.buildings(&fields).await?, buildings.into_inner())
        }
        DirectoryAction::Units => {
            let mut units = UnitDirectory::new(connector);
            (units.units(&fields).await?, units.into_inner())
        }
    };
    debug!(count = entries.len(), "directory search finished");
    connector.unbind().await?;
    print_json(&entries)
}

pub async fn remedy(
    config: &NcstateConfig,
    action: RemedyAction,
    user: &str,
    password: &str,
) -> Result<()> {
    let mut client = RemedyClient::new(&config.remedy, &config.http, user, password)?;

    let result = match action {
        RemedyAction::Call { call_id } => client.call_get(&call_id).await?,
        RemedyAction::Calls { qualification, start, max } => {
            client.call_list(&qualification, start, max).await?
        }
        RemedyAction::Create { fields } => {
            let data: FieldMap = fields.into_iter().collect();
            client.call_create(&data).await?
        }
        RemedyAction::TopSolutions { max } => client.top_solution_list(None, None, max).await?,
        RemedyAction::Solution { solution_id } => client.solution_get(&solution_id).await?,
        RemedyAction::Validate { login, secret } => {
            client.validate_credentials(&login, &secret).await?
        }
    };
    print_json(&result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_flag_selects_format() {
        assert_eq!(format_for(true), ResponseFormat::Xml);
        assert_eq!(format_for(false), ResponseFormat::Json);
    }
}
