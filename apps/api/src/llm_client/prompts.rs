// Shared prompt fragments. Each module that needs LLM calls defines its
// own prompts.rs alongside it; this file holds the cross-cutting pieces.

/// Domain framing shared by the extraction and analysis prompts.
pub const KENYAN_PROCUREMENT_CONTEXT: &str = "\
    Context: Kenyan public procurement. Tenders are published by national \
    and county government entities and parastatals. Amounts are in Kenyan \
    Shillings (KES). Locations are the 47 counties or 'National'. Common \
    categories: ICT, Construction, Supplies, Consultancy, Medical, \
    Agriculture, Transport, Security, Energy.";
