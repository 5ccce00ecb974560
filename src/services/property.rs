//! Property service
//!
//! Business logic for properties and the units inside them. Structural
//! changes are refused while dependent records exist: a property with units
//! cannot be deleted, nor can a unit that still has bookings or expenses.

use crate::audit::EntityType;
use crate::error::{StayError, StayResult};
use crate::models::{Money, Property, PropertyId, Unit, UnitId, UnitKind};
use crate::storage::Storage;

/// Fields for a new unit
#[derive(Debug, Clone, Default)]
pub struct NewUnit {
    pub name: String,
    pub kind: UnitKind,
    pub beds: u32,
    pub baths: u32,
    pub surface: u32,
    pub base_price: Money,
    pub notes: String,
}

/// Partial update for a property; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct PropertyUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Partial update for a unit; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UnitUpdate {
    pub name: Option<String>,
    pub kind: Option<UnitKind>,
    pub beds: Option<u32>,
    pub baths: Option<u32>,
    pub surface: Option<u32>,
    pub base_price: Option<Money>,
    pub notes: Option<String>,
}

/// Service for property and unit management
pub struct PropertyService<'a> {
    storage: &'a Storage,
}

impl<'a> PropertyService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new property
    pub fn create(&self, name: &str, address: &str, notes: &str) -> StayResult<Property> {
        let name = name.trim();
        if self.find_by_name(name)?.is_some() {
            return Err(StayError::Duplicate {
                entity_type: "Property",
                identifier: name.to_string(),
            });
        }

        let mut property = Property::new(name, address.trim());
        property.notes = notes.trim().to_string();
        property
            .validate()
            .map_err(|e| StayError::Validation(e.to_string()))?;

        self.storage.properties.upsert(property.clone())?;
        self.storage.properties.save()?;
        self.storage.log_create(
            EntityType::Property,
            property.id.to_string(),
            Some(property.name.clone()),
            &property,
        )?;

        tracing::info!(property = %property.id, name = %property.name, "property created");
        Ok(property)
    }

    pub fn get(&self, id: PropertyId) -> StayResult<Option<Property>> {
        self.storage.properties.get(id)
    }

    pub fn list(&self) -> StayResult<Vec<Property>> {
        let mut properties = self.storage.properties.get_all()?;
        properties.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(properties)
    }

    fn find_by_name(&self, name: &str) -> StayResult<Option<Property>> {
        let needle = name.trim().to_lowercase();
        Ok(self
            .storage
            .properties
            .filter(|p| p.name.to_lowercase() == needle)?
            .into_iter()
            .next())
    }

    /// Find a property by name (case-insensitive) or ID string
    pub fn find(&self, identifier: &str) -> StayResult<Option<Property>> {
        if let Some(property) = self.find_by_name(identifier)? {
            return Ok(Some(property));
        }
        self.storage.properties.find_by_id_str(identifier)
    }

    /// Like [`find`](Self::find) but missing is an error
    pub fn require(&self, identifier: &str) -> StayResult<Property> {
        self.find(identifier)?
            .ok_or_else(|| StayError::property_not_found(identifier))
    }

    pub fn update(&self, id: PropertyId, changes: PropertyUpdate) -> StayResult<Property> {
        let before = self
            .storage
            .properties
            .get(id)?
            .ok_or_else(|| StayError::property_not_found(id.to_string()))?;
        let mut property = before.clone();

        if let Some(name) = changes.name {
            let name = name.trim().to_string();
            if let Some(other) = self.find_by_name(&name)? {
                if other.id != id {
                    return Err(StayError::Duplicate {
                        entity_type: "Property",
                        identifier: name,
                    });
                }
            }
            property.name = name;
        }
        if let Some(address) = changes.address {
            property.address = address.trim().to_string();
        }
        if let Some(notes) = changes.notes {
            property.notes = notes;
        }

        property
            .validate()
            .map_err(|e| StayError::Validation(e.to_string()))?;
        property.updated_at = chrono::Utc::now();

        self.storage.properties.upsert(property.clone())?;
        self.storage.properties.save()?;
        self.storage.log_update(
            EntityType::Property,
            property.id.to_string(),
            Some(property.name.clone()),
            &before,
            &property,
        )?;

        Ok(property)
    }

    /// Delete a property that has no units left
    pub fn delete(&self, id: PropertyId) -> StayResult<Property> {
        let property = self
            .storage
            .properties
            .get(id)?
            .ok_or_else(|| StayError::property_not_found(id.to_string()))?;

        let units = self.units(id)?;
        if !units.is_empty() {
            return Err(StayError::Validation(format!(
                "Property '{}' still has {} unit(s); delete them first",
                property.name,
                units.len()
            )));
        }
        if self.storage.fixed_expenses.any(|e| e.property_id == id)?
            || self.storage.variable_expenses.any(|e| e.property_id == id)?
        {
            return Err(StayError::Validation(format!(
                "Property '{}' still has expenses",
                property.name
            )));
        }

        self.storage.properties.delete(id)?;
        self.storage.properties.save()?;
        self.storage.log_delete(
            EntityType::Property,
            property.id.to_string(),
            Some(property.name.clone()),
            &property,
        )?;

        tracing::info!(property = %property.id, "property deleted");
        Ok(property)
    }

    /// Add a unit to a property
    pub fn add_unit(&self, property_id: PropertyId, new: NewUnit) -> StayResult<Unit> {
        let property = self
            .storage
            .properties
            .get(property_id)?
            .ok_or_else(|| StayError::property_not_found(property_id.to_string()))?;

        let name = new.name.trim();
        if self.find_unit_by_name(property_id, name)?.is_some() {
            return Err(StayError::Duplicate {
                entity_type: "Unit",
                identifier: format!("{} / {}", property.name, name),
            });
        }

        let mut unit = Unit::new(property_id, name, new.kind);
        unit.beds = new.beds;
        unit.baths = new.baths;
        unit.surface = new.surface;
        unit.base_price = new.base_price;
        unit.notes = new.notes;
        unit.validate()
            .map_err(|e| StayError::Validation(e.to_string()))?;

        self.storage.units.upsert(unit.clone())?;
        self.storage.units.save()?;
        self.storage.log_create(
            EntityType::Unit,
            unit.id.to_string(),
            Some(unit.name.clone()),
            &unit,
        )?;

        Ok(unit)
    }

    /// Units of a property, by name
    pub fn units(&self, property_id: PropertyId) -> StayResult<Vec<Unit>> {
        let mut units = self.storage.units.filter(|u| u.property_id == property_id)?;
        units.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(units)
    }

    pub fn get_unit(&self, id: UnitId) -> StayResult<Option<Unit>> {
        self.storage.units.get(id)
    }

    fn find_unit_by_name(&self, property_id: PropertyId, name: &str) -> StayResult<Option<Unit>> {
        let needle = name.trim().to_lowercase();
        Ok(self
            .storage
            .units
            .filter(|u| u.property_id == property_id && u.name.to_lowercase() == needle)?
            .into_iter()
            .next())
    }

    /// Find a unit by ID string, or by name within a property
    pub fn find_unit(&self, identifier: &str, property_id: Option<PropertyId>) -> StayResult<Option<Unit>> {
        if let Some(unit) = self.storage.units.find_by_id_str(identifier)? {
            return Ok(Some(unit));
        }

        let needle = identifier.trim().to_lowercase();
        let matches = self.storage.units.filter(|u| {
            u.name.to_lowercase() == needle && property_id.map_or(true, |p| u.property_id == p)
        })?;

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.into_iter().next()),
            n => Err(StayError::Validation(format!(
                "{} units are named '{}'; use the unit id or pass the property",
                n,
                identifier.trim()
            ))),
        }
    }

    pub fn require_unit(&self, identifier: &str, property_id: Option<PropertyId>) -> StayResult<Unit> {
        self.find_unit(identifier, property_id)?
            .ok_or_else(|| StayError::unit_not_found(identifier))
    }

    pub fn update_unit(&self, id: UnitId, changes: UnitUpdate) -> StayResult<Unit> {
        let before = self
            .storage
            .units
            .get(id)?
            .ok_or_else(|| StayError::unit_not_found(id.to_string()))?;
        let mut unit = before.clone();

        if let Some(name) = changes.name {
            let name = name.trim().to_string();
            if let Some(other) = self.find_unit_by_name(unit.property_id, &name)? {
                if other.id != id {
                    return Err(StayError::Duplicate {
                        entity_type: "Unit",
                        identifier: name,
                    });
                }
            }
            unit.name = name;
        }
        if let Some(kind) = changes.kind {
            unit.kind = kind;
        }
        if let Some(beds) = changes.beds {
            unit.beds = beds;
        }
        if let Some(baths) = changes.baths {
            unit.baths = baths;
        }
        if let Some(surface) = changes.surface {
            unit.surface = surface;
        }
        if let Some(price) = changes.base_price {
            unit.base_price = price;
        }
        if let Some(notes) = changes.notes {
            unit.notes = notes;
        }

        unit.validate()
            .map_err(|e| StayError::Validation(e.to_string()))?;
        unit.updated_at = chrono::Utc::now();

        self.storage.units.upsert(unit.clone())?;
        self.storage.units.save()?;
        self.storage.log_update(
            EntityType::Unit,
            unit.id.to_string(),
            Some(unit.name.clone()),
            &before,
            &unit,
        )?;

        Ok(unit)
    }

    /// Delete a unit with no bookings or expenses
    pub fn delete_unit(&self, id: UnitId) -> StayResult<Unit> {
        let unit = self
            .storage
            .units
            .get(id)?
            .ok_or_else(|| StayError::unit_not_found(id.to_string()))?;

        if !self.storage.bookings.get_by_unit(id)?.is_empty() {
            return Err(StayError::Validation(format!(
                "Unit '{}' has bookings and cannot be deleted",
                unit.name
            )));
        }
        if self.storage.fixed_expenses.any(|e| e.unit_id == Some(id))?
            || self.storage.variable_expenses.any(|e| e.unit_id == Some(id))?
        {
            return Err(StayError::Validation(format!(
                "Unit '{}' has expenses and cannot be deleted",
                unit.name
            )));
        }

        self.storage.units.delete(id)?;
        self.storage.units.save()?;
        self.storage.log_delete(
            EntityType::Unit,
            unit.id.to_string(),
            Some(unit.name.clone()),
            &unit,
        )?;

        Ok(unit)
    }
}
